//! Acquire-release publication prover.
//!
//! A writer performs a plain (unsynchronized) write and then a release (or
//! stronger) store to an atomic gate. Any reader whose acquire (or
//! stronger) load observes the gate's new value is guaranteed, by the
//! release/acquire happens-before edge, to also observe the plain write
//! with no synchronization of its own on the plain location. The plain cell
//! is racy by construction: the edge under test is the only thing making
//! the access sound, which is the crux of the test, not an oversight.

use std::thread;

use memord_core::cell::{AtomicCell, AtomicValue};
use memord_core::plain::PlainCell;

use crate::config::TrialConfig;
use crate::spin::spin_until;

/// Payload value before publication.
pub const STALE_PAYLOAD: i32 = 5;

/// Payload value written immediately before the gate store.
pub const PUBLISHED_PAYLOAD: i32 = 6;

/// Prove that the plain payload written before `store` is visible to every
/// reader whose `load` observes the gate's new value.
///
/// Per trial: `cfg.publish_readers` reader threads spin on the gate; the
/// spawning thread writes the payload, stores the gate, and then blocks
/// only at join. As with the total-order prover, the result is
/// scheduling-dependent and the trial loop is what gives a too-weak order a
/// realistic chance to expose itself.
///
/// # Panics
///
/// Panics (fatally, by design) if any reader observes the new gate value
/// while still reading the stale payload, or if a spin cap is configured
/// and the gate update never becomes visible.
pub fn prove_release_acquire_publication<T, S, L>(
    cfg: &TrialConfig,
    old: T,
    new: T,
    store: S,
    load: L,
) where
    T: AtomicValue + Send,
    S: Fn(&AtomicCell<T>, T, T) + Sync,
    L: Fn(&AtomicCell<T>) -> T + Sync,
{
    if !cfg.threads_enabled() {
        // Single-threaded target: degrade to a trivial pass.
        return;
    }

    for trial in 0..cfg.trials {
        let gate = AtomicCell::new(old);
        let payload = PlainCell::new(STALE_PAYLOAD);

        thread::scope(|s| {
            let gate = &gate;
            let payload = &payload;
            let load = &load;

            let readers: Vec<_> = (0..cfg.publish_readers)
                .map(|reader| {
                    s.spawn(move || {
                        if let Err(timeout) = spin_until(|| load(gate) == new, cfg.spin_cap) {
                            panic!(
                                "reader {reader}: gate update never became visible ({timeout})"
                            );
                        }
                        // SAFETY: the load above returned the writer's new
                        // value, so the release-store and everything before
                        // it, the payload write included, happens-before
                        // this read, and no later writes exist.
                        let seen = unsafe { payload.read() };
                        assert_eq!(
                            seen, PUBLISHED_PAYLOAD,
                            "trial {trial}, reader {reader}: observed the gate update but a stale payload"
                        );
                    })
                })
                .collect();

            // SAFETY: readers only touch the payload after observing the gate
            // store issued below, and this thread writes nothing afterwards.
            unsafe { payload.write(PUBLISHED_PAYLOAD) };
            store(gate, old, new);

            // Join explicitly so a panicking reader surfaces its own message
            // instead of the scope's generic one.
            for handle in readers {
                if let Err(panic_payload) = handle.join() {
                    std::panic::resume_unwind(panic_payload);
                }
            }
        });
    }
}
