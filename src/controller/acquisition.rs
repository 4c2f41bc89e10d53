use super::liveness::Liveness;
use crate::services::FallbackDataSource;
use crate::state::StateManager;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::{AbortHandle, JoinHandle};

/// Drives one [`FallbackDataSource`] acquisition per activation.
///
/// Activation sets `Loading` immediately and spawns the two-tier attempt. The
/// result is applied only if, when it settles, the controller has not been torn
/// down and no newer activation has started. That check happens inside
/// [`StateManager::finish_acquisition`] under the state's write lock; aborting
/// the superseded task is only a shortcut.
///
/// Must be activated from within a tokio runtime.
pub struct AcquisitionController {
    state: StateManager,
    source: Arc<FallbackDataSource>,
    liveness: Liveness,
    in_flight: Mutex<Option<AbortHandle>>,
}

impl AcquisitionController {
    pub fn new(state: StateManager, source: FallbackDataSource) -> Self {
        Self {
            state,
            source: Arc::new(source),
            liveness: Liveness::new(),
            in_flight: Mutex::new(None),
        }
    }

    /// Start a new cycle, superseding any cycle still in flight
    ///
    /// The returned handle completes once the cycle has settled (or been
    /// discarded). Awaiting it is optional.
    pub fn activate(&self) -> JoinHandle<()> {
        if !self.liveness.is_alive() {
            tracing::warn!("Acquisition requested after teardown; ignoring");
            return tokio::spawn(async {});
        }

        let token = self.liveness.begin();
        self.abort_in_flight();

        let metrics = self.state.metrics();
        metrics.record_acquisition_started();
        let cycle = token.generation();
        self.state.begin_acquisition(cycle);
        tracing::info!("Acquisition cycle {} started", cycle);

        let state = self.state.clone();
        let source = Arc::clone(&self.source);
        let handle = tokio::spawn(async move {
            let outcome = source.acquire().await;

            // The state accepts the result only if this cycle is still pending;
            // a superseded or abandoned cycle is counted as stale there.
            match outcome {
                Ok(acquisition) => {
                    let count = acquisition.users.len();
                    if state.finish_acquisition(cycle, Ok(acquisition.users)).is_some() {
                        metrics.record_loaded_from(acquisition.tier);
                        tracing::info!(
                            "Acquisition cycle {} ready: {} users from {} tier",
                            cycle,
                            count,
                            acquisition.tier
                        );
                    }
                }
                Err(e) => {
                    let message = e.to_string();
                    if state.finish_acquisition(cycle, Err(message)).is_some() {
                        metrics.record_acquisition_failed();
                        tracing::error!("Acquisition cycle {} failed: {}", cycle, e);
                    }
                }
            }
        });

        *self.lock_in_flight() = Some(handle.abort_handle());
        handle
    }

    /// The consumer is gone: cancel the in-flight cycle and never apply another result
    pub fn teardown(&self) {
        if self.liveness.is_alive() {
            tracing::debug!("Acquisition controller torn down");
        }
        self.liveness.shut_down();
        self.abort_in_flight();
        self.state.abandon_acquisition();
    }

    pub fn is_active(&self) -> bool {
        self.liveness.is_alive()
    }

    fn lock_in_flight(&self) -> std::sync::MutexGuard<'_, Option<AbortHandle>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn abort_in_flight(&self) {
        if let Some(handle) = self.lock_in_flight().take() {
            handle.abort();
        }
    }
}

impl Drop for AcquisitionController {
    fn drop(&mut self) {
        self.teardown();
    }
}
