// State management module
//
// This module provides the StateManager which wraps AppState with thread-safe access
// using Arc<RwLock<T>> and emits change events for the renderer.

use crate::metrics::Metrics;
use crate::models::{AcquisitionResult, AppState, Records, SortConfig, SortField};
use crate::services::{TableView, ViewComposer};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

/// Change events emitted when state is modified
///
/// The renderer subscribes to these instead of polling the state.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// A new acquisition cycle began; consumers should show a loading state
    AcquisitionStarted,

    /// The cycle settled with records
    UsersLoaded { count: usize },

    /// The cycle settled with every tier exhausted
    AcquisitionFailed { message: String },

    /// The text in the search box changed (not yet applied)
    SearchInputChanged { raw_input: String },

    /// The debounced term applied to filtering changed
    SearchCommitted { term: String },

    /// The active ordering was replaced
    SortChanged { config: SortConfig },
}

/// Thread-safe state manager with event emission
///
/// This is the single owner of the session's [`AppState`]:
/// - Provides thread-safe access via `Arc<RwLock<T>>`
/// - Applies only the documented transitions (acquisition lifecycle, search, sort)
/// - Detects what changed and broadcasts [`StateChange`] events
/// - Serves the memoised [`TableView`] for the current inputs
///
/// Guarded transitions (`finish_acquisition`, `commit_pending_search`) check
/// that their result is still wanted under the same write lock as the change,
/// so a late continuation can never overwrite newer state.
pub struct StateManager {
    /// The session state protected by RwLock for thread-safe access
    state: Arc<RwLock<AppState>>,

    /// Filter/sort cache, shared by all clones of this manager
    composer: Arc<Mutex<ViewComposer>>,

    /// Broadcast channel for emitting state change events
    state_tx: broadcast::Sender<StateChange>,

    metrics: Arc<Metrics>,
}

impl StateManager {
    /// Create a new StateManager with default state
    ///
    /// The broadcast channel buffers 100 events.
    pub fn new() -> Self {
        Self::with_metrics(Arc::new(Metrics::new()))
    }

    pub fn with_metrics(metrics: Arc<Metrics>) -> Self {
        let (state_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(AppState::default())),
            composer: Arc::new(Mutex::new(ViewComposer::new())),
            state_tx,
            metrics,
        }
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, AppState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, AppState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get a read-only snapshot of the current state
    ///
    /// Cheap: the record set is shared, not copied.
    pub fn snapshot(&self) -> AppState {
        self.read_guard().clone()
    }

    /// Execute a function with read access to the state
    ///
    /// # Example
    /// ```ignore
    /// let loading = state_manager.read(|state| state.acquisition.is_loading());
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&AppState) -> R,
    {
        let state = self.read_guard();
        f(&state)
    }

    /// Apply a mutation, then detect and broadcast what changed
    fn update<F>(&self, update_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut AppState),
    {
        self.try_update(|state| {
            update_fn(state);
            true
        })
        .unwrap_or_default()
    }

    /// Like `update`, but `update_fn` may refuse by returning `false` before
    /// touching the state. The check and the write share one write lock.
    fn try_update<F>(&self, update_fn: F) -> Option<Vec<StateChange>>
    where
        F: FnOnce(&mut AppState) -> bool,
    {
        let changes = {
            let mut state = self.write_guard();
            let old_state = state.clone();
            if !update_fn(&mut state) {
                return None;
            }
            Self::detect_changes(&old_state, &state)
        };

        self.metrics.record_state_update();
        for change in &changes {
            self.emit(change.clone());
        }

        Some(changes)
    }

    fn emit(&self, change: StateChange) {
        // It's OK if no one is listening
        if self.state_tx.send(change).is_ok() {
            self.metrics.record_state_broadcast();
        }
    }

    /// Subscribe to state change events
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    fn detect_changes(old: &AppState, new: &AppState) -> Vec<StateChange> {
        let mut changes = Vec::new();

        if old.acquisition != new.acquisition {
            changes.push(match &new.acquisition {
                AcquisitionResult::Loading => StateChange::AcquisitionStarted,
                AcquisitionResult::Ready(records) => StateChange::UsersLoaded {
                    count: records.len(),
                },
                AcquisitionResult::Failed(message) => StateChange::AcquisitionFailed {
                    message: message.clone(),
                },
            });
        }

        if old.search.raw_input != new.search.raw_input {
            changes.push(StateChange::SearchInputChanged {
                raw_input: new.search.raw_input.clone(),
            });
        }

        if old.search.committed_term != new.search.committed_term {
            changes.push(StateChange::SearchCommitted {
                term: new.search.committed_term.clone(),
            });
        }

        if old.sort != new.sort {
            changes.push(StateChange::SortChanged { config: new.sort });
        }

        changes
    }

    // Transitions

    /// Enter `Loading` for `cycle`, discarding any previous error or records
    ///
    /// From here on only `cycle` may settle the acquisition. Always reports
    /// [`StateChange::AcquisitionStarted`], even when the previous cycle was
    /// itself still loading.
    pub fn begin_acquisition(&self, cycle: u64) -> Vec<StateChange> {
        let mut changes = self.update(|state| {
            state.acquisition = AcquisitionResult::Loading;
            state.pending_cycle = Some(cycle);
        });

        if !changes.contains(&StateChange::AcquisitionStarted) {
            self.emit(StateChange::AcquisitionStarted);
            changes.push(StateChange::AcquisitionStarted);
        }

        changes
    }

    /// Settle `cycle` with records or a failure message
    ///
    /// Returns `None`, leaving the state untouched, unless `cycle` is the
    /// pending one and the acquisition is still `Loading`. A superseded,
    /// abandoned or already settled cycle can therefore never overwrite a
    /// newer one.
    pub fn finish_acquisition(
        &self,
        cycle: u64,
        outcome: Result<Records, String>,
    ) -> Option<Vec<StateChange>> {
        let changes = self.try_update(|state| {
            if state.pending_cycle != Some(cycle) || !state.acquisition.is_loading() {
                return false;
            }
            state.pending_cycle = None;
            state.acquisition = match outcome {
                Ok(records) => AcquisitionResult::Ready(records),
                Err(message) => AcquisitionResult::Failed(message),
            };
            true
        });

        if changes.is_none() {
            self.metrics.record_stale_result();
            tracing::debug!(
                "Discarding result of acquisition cycle {}: no longer pending",
                cycle
            );
        }
        changes
    }

    /// No pending cycle may settle the acquisition any more
    pub fn abandon_acquisition(&self) {
        self.update(|state| {
            state.pending_cycle = None;
        });
    }

    /// Reflect what the user typed, without touching the applied term
    pub fn set_search_input(&self, raw_input: String) -> Vec<StateChange> {
        self.update(|state| {
            state.search.raw_input = raw_input;
        })
    }

    /// Apply a term to filtering unconditionally
    pub fn commit_search(&self, term: String) -> Vec<StateChange> {
        self.update(|state| {
            state.search.committed_term = term;
        })
    }

    /// Apply a debounced term, but only if it is still what the search box holds
    ///
    /// Returns `None` when newer input arrived after the commit was scheduled.
    pub fn commit_pending_search(&self, term: String) -> Option<Vec<StateChange>> {
        self.try_update(|state| {
            if state.search.raw_input != term {
                return false;
            }
            state.search.committed_term = term;
            true
        })
    }

    /// Replace the active ordering
    pub fn set_sort(&self, config: SortConfig) -> Vec<StateChange> {
        self.update(|state| {
            state.sort = config;
        })
    }

    /// Header click: flip direction on the active column, otherwise sort ascending by `field`
    pub fn toggle_sort(&self, field: SortField) -> Vec<StateChange> {
        self.update(|state| {
            state.sort = state.sort.toggled(field);
        })
    }

    /// Rows to display for the current records, committed term and sort
    ///
    /// `None` unless the last cycle settled with records. Repeated calls with
    /// unchanged inputs reuse the cached view.
    pub fn view(&self) -> Option<TableView> {
        let (records, term, sort) = self.read(|state| {
            state.records().map(|records| {
                (
                    Arc::clone(records),
                    state.search.committed_term.clone(),
                    state.sort,
                )
            })
        })?;

        let mut composer = self.composer.lock().unwrap_or_else(PoisonError::into_inner);
        let before = composer.recomputations();
        let view = composer.compose(&records, &term, sort);
        if composer.recomputations() != before {
            self.metrics.record_view_recomputation();
        }

        Some(view)
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

// Clones share the same state, cache, channel and metrics
impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            composer: Arc::clone(&self.composer),
            state_tx: self.state_tx.clone(),
            metrics: Arc::clone(&self.metrics),
        }
    }
}
