//! Process-wide construction/destruction counters.
//!
//! Lifecycle-sensitive cases elsewhere in the suite wrap their payloads in
//! [`Counted`] and check that construct/drop counts balance. The counters
//! are process-wide and reset per test, so tests that touch them serialize
//! on [`exclusive`].

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, MutexGuard};

static CONSTRUCTED: AtomicU64 = AtomicU64::new(0);
static DESTROYED: AtomicU64 = AtomicU64::new(0);

static COUNTER_LOCK: Mutex<()> = Mutex::new(());

/// Take the counter lock. Hold the guard for the whole test body; counters
/// are meaningless while another test is mutating them.
#[must_use]
pub fn exclusive() -> MutexGuard<'static, ()> {
    COUNTER_LOCK.lock()
}

/// Reset both counters to zero. Call with the [`exclusive`] guard held.
pub fn reset() {
    CONSTRUCTED.store(0, Ordering::Relaxed);
    DESTROYED.store(0, Ordering::Relaxed);
}

/// Point-in-time view of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub constructed: u64,
    pub destroyed: u64,
}

impl CounterSnapshot {
    /// Constructed-but-not-yet-destroyed count.
    #[must_use]
    pub fn live(self) -> u64 {
        self.constructed.saturating_sub(self.destroyed)
    }
}

#[must_use]
pub fn snapshot() -> CounterSnapshot {
    CounterSnapshot {
        constructed: CONSTRUCTED.load(Ordering::Relaxed),
        destroyed: DESTROYED.load(Ordering::Relaxed),
    }
}

/// Wrapper that counts its constructions (including clones) and drops.
#[derive(Debug)]
pub struct Counted<T> {
    value: T,
}

impl<T> Counted<T> {
    pub fn new(value: T) -> Self {
        CONSTRUCTED.fetch_add(1, Ordering::Relaxed);
        Self { value }
    }

    #[must_use]
    pub fn get(&self) -> &T {
        &self.value
    }
}

impl<T: Clone> Clone for Counted<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> Drop for Counted<T> {
    fn drop(&mut self) {
        DESTROYED.fetch_add(1, Ordering::Relaxed);
    }
}

impl<T> std::ops::Deref for Counted<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}
