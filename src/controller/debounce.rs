use super::liveness::Liveness;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::AbortHandle;
use tokio::time::{Instant, sleep_until};

/// Default quiet period before a search input is committed.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Trailing-edge debouncer.
///
/// Each [`schedule`](Self::schedule) cancels the pending commit and replaces it
/// with a new one due `window` after the call. Only an action that survives a
/// full quiet window runs. Must be used from within a tokio runtime.
pub struct Debouncer {
    window: Duration,
    liveness: Liveness,
    pending: Mutex<Option<AbortHandle>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            liveness: Liveness::new(),
            pending: Mutex::new(None),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Run `action` once `window` has elapsed without another call
    pub fn schedule<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let token = self.liveness.begin();
        // Deadline is taken now, not when the task is first polled.
        let deadline = Instant::now() + self.window;

        let handle = tokio::spawn(async move {
            sleep_until(deadline).await;
            if token.is_current() {
                action();
            }
        });

        if let Some(previous) = self.lock_pending().replace(handle.abort_handle()) {
            previous.abort();
        }
    }

    /// Drop the pending action, if any, without running it
    pub fn cancel(&self) {
        self.liveness.invalidate();
        if let Some(previous) = self.lock_pending().take() {
            previous.abort();
        }
    }

    /// Cancel and refuse to run anything scheduled later
    pub fn shut_down(&self) {
        self.liveness.shut_down();
        self.cancel();
    }

    /// True while an action is waiting for its window to elapse
    pub fn is_pending(&self) -> bool {
        self.lock_pending()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<AbortHandle>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.shut_down();
    }
}
