// Session metrics
//
// Lightweight counters for acquisitions, fallbacks and view work

use crate::services::Tier;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Per-session counters.
///
/// Uses atomic operations for thread-safe tracking without locks. Shared via
/// `Arc` between the state manager, the acquisition controller and the debouncer.
#[derive(Debug)]
pub struct Metrics {
    /// Acquisition cycles started (initial load and retries)
    pub acquisitions_started: AtomicU64,

    /// Cycles satisfied by the remote tier
    pub remote_loads: AtomicU64,

    /// Cycles satisfied by the local fallback tier
    pub fallback_loads: AtomicU64,

    /// Cycles where every tier failed
    pub acquisitions_failed: AtomicU64,

    /// Results that settled after teardown or after a newer cycle started
    pub stale_results_discarded: AtomicU64,

    /// Debounced search terms that reached the state
    pub search_commits: AtomicU64,

    /// Times the filter/sort pipeline actually ran
    pub view_recomputations: AtomicU64,

    /// Number of state updates performed
    pub state_updates: AtomicU64,

    /// Number of change events delivered to at least one subscriber
    pub state_broadcasts: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            acquisitions_started: AtomicU64::new(0),
            remote_loads: AtomicU64::new(0),
            fallback_loads: AtomicU64::new(0),
            acquisitions_failed: AtomicU64::new(0),
            stale_results_discarded: AtomicU64::new(0),
            search_commits: AtomicU64::new(0),
            view_recomputations: AtomicU64::new(0),
            state_updates: AtomicU64::new(0),
            state_broadcasts: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_acquisition_started(&self) {
        self.acquisitions_started.fetch_add(1, Ordering::Relaxed);
    }

    /// Record which tier satisfied a cycle
    pub fn record_loaded_from(&self, tier: Tier) {
        match tier {
            Tier::Remote => self.remote_loads.fetch_add(1, Ordering::Relaxed),
            Tier::Local => self.fallback_loads.fetch_add(1, Ordering::Relaxed),
        };
    }

    pub fn record_acquisition_failed(&self) {
        self.acquisitions_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale_result(&self) {
        self.stale_results_discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_search_commit(&self) {
        self.search_commits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_view_recomputation(&self) {
        self.view_recomputations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_state_update(&self) {
        self.state_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_state_broadcast(&self) {
        self.state_broadcasts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Share of successful cycles that needed the fallback tier
    pub fn fallback_ratio(&self) -> f64 {
        let remote = self.remote_loads.load(Ordering::Relaxed);
        let fallback = self.fallback_loads.load(Ordering::Relaxed);
        let total = remote + fallback;
        if total > 0 {
            fallback as f64 / total as f64
        } else {
            0.0
        }
    }

    pub fn log_summary(&self) {
        tracing::info!("=== Session Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Acquisitions: {} started, {} remote, {} fallback ({:.0}%), {} failed, {} stale",
            self.acquisitions_started.load(Ordering::Relaxed),
            self.remote_loads.load(Ordering::Relaxed),
            self.fallback_loads.load(Ordering::Relaxed),
            self.fallback_ratio() * 100.0,
            self.acquisitions_failed.load(Ordering::Relaxed),
            self.stale_results_discarded.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Search commits: {}, view recomputations: {}",
            self.search_commits.load(Ordering::Relaxed),
            self.view_recomputations.load(Ordering::Relaxed)
        );
        tracing::info!(
            "State updates: {}, broadcasts: {}",
            self.state_updates.load(Ordering::Relaxed),
            self.state_broadcasts.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
