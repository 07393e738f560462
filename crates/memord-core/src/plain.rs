//! Plain, unsynchronized memory location.
//!
//! [`PlainCell`] exists to witness happens-before edges: the publication
//! prover writes it on one thread before a release-store and reads it on
//! other threads after a matching acquire-load. That pairing is the only
//! thing making the access race-free; the cell itself carries no
//! synchronization, and must not, or the property under test disappears.

use core::cell::UnsafeCell;

/// An ordinary memory location shared across threads without any
/// synchronization of its own.
#[derive(Debug)]
pub struct PlainCell<T> {
    slot: UnsafeCell<T>,
}

// SAFETY: sharing is sound only under the publication contract documented
// on `read`/`write`; both are unsafe fns that restate it.
unsafe impl<T: Send> Sync for PlainCell<T> {}

impl<T: Copy> PlainCell<T> {
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self {
            slot: UnsafeCell::new(value),
        }
    }

    /// Read the current value.
    ///
    /// # Safety
    ///
    /// Every write to this cell must happen-before this read (for the
    /// publication prover: the writer's release-store has been observed by
    /// this thread's acquire-load, and no further writes occur). Calling
    /// this while a write may still be in flight is a data race.
    #[must_use]
    pub unsafe fn read(&self) -> T {
        // SAFETY: caller upholds the happens-before contract above.
        unsafe { *self.slot.get() }
    }

    /// Overwrite the value.
    ///
    /// # Safety
    ///
    /// No other thread may read or write the cell concurrently; readers
    /// must be gated behind a synchronizing store issued after this write.
    pub unsafe fn write(&self, value: T) {
        // SAFETY: caller guarantees exclusive access at this point.
        unsafe { *self.slot.get() = value }
    }
}
