//! Busy-spin waiting.
//!
//! Reader threads in both provers block only by polling an atomic load.
//! Nothing here may be replaced with a futex, condition variable, or sleep:
//! kernel-level synchronization inserts its own fences and can hide exactly
//! the reordering the suite exists to detect. The optional iteration cap
//! converts a hang (a store visible to no load) into a loud, attributable
//! timeout failure instead of a stuck CI job.

use thiserror::Error;

/// A spin-wait exceeded its iteration cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("spin-wait exceeded {cap} iterations")]
pub struct SpinTimeout {
    pub cap: u64,
}

/// Poll `cond` until it holds, yielding only the CPU's spin hint between
/// probes. Returns the number of iterations spent waiting.
pub fn spin_until(mut cond: impl FnMut() -> bool, cap: Option<u64>) -> Result<u64, SpinTimeout> {
    let mut spun: u64 = 0;
    while !cond() {
        spun += 1;
        if let Some(cap) = cap {
            if spun >= cap {
                return Err(SpinTimeout { cap });
            }
        }
        core::hint::spin_loop();
    }
    Ok(spun)
}
