use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

#[derive(Debug)]
struct Inner {
    generation: AtomicU64,
    alive: AtomicBool,
}

/// Validity flag shared between an owner and its async continuations.
///
/// Every [`begin`](Self::begin) hands out a [`CycleToken`] and invalidates all
/// earlier ones. [`shut_down`](Self::shut_down) invalidates everything for good.
/// A continuation checks its token before applying any effect.
#[derive(Debug, Clone)]
pub struct Liveness {
    inner: Arc<Inner>,
}

impl Liveness {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                generation: AtomicU64::new(0),
                alive: AtomicBool::new(true),
            }),
        }
    }

    /// Start a new cycle, superseding any outstanding token.
    pub fn begin(&self) -> CycleToken {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        CycleToken {
            generation,
            liveness: self.clone(),
        }
    }

    /// Invalidate outstanding tokens without shutting down.
    pub fn invalidate(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// The consumer is gone: no token will ever be current again.
    pub fn shut_down(&self) {
        self.inner.alive.store(false, Ordering::SeqCst);
        self.invalidate();
    }

    pub fn is_alive(&self) -> bool {
        self.inner.alive.load(Ordering::SeqCst)
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof that a continuation belongs to a particular cycle.
#[derive(Debug, Clone)]
pub struct CycleToken {
    generation: u64,
    liveness: Liveness,
}

impl CycleToken {
    /// True while the owner is alive and no newer cycle has begun.
    pub fn is_current(&self) -> bool {
        self.liveness.is_alive()
            && self.liveness.inner.generation.load(Ordering::SeqCst) == self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
