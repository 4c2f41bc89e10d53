use super::user::{SortConfig, User};
use std::sync::Arc;

/// Shared, immutable record set. Replaced wholesale on every successful acquisition.
pub type Records = Arc<[User]>;

/// Outcome of the current acquisition cycle.
///
/// Exactly one variant holds at a time. The only forward transitions are
/// `Loading -> Ready` and `Loading -> Failed`; a new cycle restarts at `Loading`.
#[derive(Clone, Debug, Default)]
pub enum AcquisitionResult {
    #[default]
    Loading,
    Failed(String),
    Ready(Records),
}

impl AcquisitionResult {
    pub fn is_loading(&self) -> bool {
        matches!(self, AcquisitionResult::Loading)
    }

    pub fn records(&self) -> Option<&Records> {
        match self {
            AcquisitionResult::Ready(records) => Some(records),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AcquisitionResult::Failed(message) => Some(message),
            _ => None,
        }
    }
}

impl PartialEq for AcquisitionResult {
    /// Ready states compare by record-set identity, not contents.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AcquisitionResult::Loading, AcquisitionResult::Loading) => true,
            (AcquisitionResult::Failed(a), AcquisitionResult::Failed(b)) => a == b,
            (AcquisitionResult::Ready(a), AcquisitionResult::Ready(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Search box state: what was typed vs. what the filter actually uses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchState {
    /// Literal text in the input control, updated on every keystroke
    pub raw_input: String,

    /// Debounced term applied to filtering
    pub committed_term: String,
}

impl SearchState {
    /// True while a typed value has not yet been committed.
    pub fn is_pending(&self) -> bool {
        self.raw_input != self.committed_term
    }
}

/// Single source of truth for the table session.
///
/// Wrapped in `Arc<RwLock<AppState>>` by [`crate::state::StateManager`]; never
/// mutate it directly, go through the manager's transition methods so change
/// events are emitted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    pub acquisition: AcquisitionResult,
    pub search: SearchState,
    pub sort: SortConfig,

    /// Cycle whose result may still settle `acquisition`; `None` once it has
    /// settled or been abandoned
    pub pending_cycle: Option<u64>,
}

impl AppState {
    /// Records available for display, if the last cycle succeeded.
    pub fn records(&self) -> Option<&Records> {
        self.acquisition.records()
    }
}
