use super::table::{filter_users, sort_users};
use crate::models::{Records, SortConfig, User};
use std::sync::Arc;

/// The rows currently shown, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub rows: Arc<[User]>,

    /// Size of the full record set before filtering
    pub total: usize,
}

impl TableView {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the search matched nothing.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn summary(&self) -> String {
        format!("Showing {} of {} users", self.rows.len(), self.total)
    }
}

#[derive(Debug)]
struct ViewInputs {
    records: Records,
    term: String,
    sort: SortConfig,
}

impl ViewInputs {
    fn matches(&self, records: &Records, term: &str, sort: SortConfig) -> bool {
        Arc::ptr_eq(&self.records, records) && self.term == term && self.sort == sort
    }
}

/// Memoised filter-then-sort pipeline.
///
/// Recomputes only when the record set (by identity), the committed term or
/// the sort config differ from the previous call.
#[derive(Debug, Default)]
pub struct ViewComposer {
    cached: Option<(ViewInputs, TableView)>,
    recomputations: u64,
}

impl ViewComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compose(&mut self, records: &Records, term: &str, sort: SortConfig) -> TableView {
        if let Some((inputs, view)) = &self.cached {
            if inputs.matches(records, term, sort) {
                return view.clone();
            }
        }

        // Filter first: sort stability is defined over the filtered sequence.
        let filtered = filter_users(records, term);
        let rows = sort_users(&filtered, sort);
        let view = TableView {
            rows: Arc::from(rows),
            total: records.len(),
        };

        self.recomputations += 1;
        tracing::debug!(
            "Recomputed view: {} (term={:?}, sort={} {:?})",
            view.summary(),
            term,
            sort.field,
            sort.direction
        );

        self.cached = Some((
            ViewInputs {
                records: Arc::clone(records),
                term: term.to_string(),
                sort,
            },
            view.clone(),
        ));
        view
    }

    /// Number of times the pipeline actually ran.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// Drop the cached view and its reference to the record set.
    pub fn clear(&mut self) {
        self.cached = None;
    }
}
