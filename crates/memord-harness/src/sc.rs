//! Sequential-consistency prover.
//!
//! Verifies that updates to two independent atomic cells are perceived in a
//! single global order by all observers. Two writer threads update `x` and
//! `y`; two reader threads each wait for "their" cell to change and then
//! immediately check the other. If both readers find the other cell still
//! stale, they have observed contradictory orders of the same pair of
//! events, which is structurally impossible under sequential consistency and
//! exactly what a weaker ordering is allowed to produce.
//!
//! The prover imposes no ordering of its own beyond what the supplied
//! store/load closures carry, so an observed violation belongs to the
//! atomic primitive, not the harness.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use memord_core::cell::{AtomicCell, AtomicValue};

use crate::config::TrialConfig;
use crate::spin::spin_until;

/// Per-trial record of which reader saw "its" cell update before the other.
///
/// Constructed fresh for every trial; the flags die with the trial.
#[derive(Debug, Default)]
pub struct ObservationFlags {
    x_first: AtomicBool,
    y_first: AtomicBool,
}

impl ObservationFlags {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reader A saw `x` updated while `y` still held the old value.
    ///
    /// Relaxed is deliberate: the scope join publishes the flag to the
    /// asserting thread, and any stronger order here could mask the very
    /// reordering under test on the cells.
    pub fn record_x_first(&self) {
        self.x_first.store(true, Ordering::Relaxed);
    }

    /// Reader B saw `y` updated while `x` still held the old value.
    pub fn record_y_first(&self) {
        self.y_first.store(true, Ordering::Relaxed);
    }

    /// Both readers claim they saw the opposite update first.
    #[must_use]
    pub fn contradiction(&self) -> bool {
        self.x_first.load(Ordering::Relaxed) && self.y_first.load(Ordering::Relaxed)
    }
}

/// Prove that `store`/`load` (bound by the caller to the memory order under
/// test) put all observers into agreement on one update order.
///
/// Repeats the four-thread trial `cfg.trials` times. Probabilistic by
/// nature: a single quiet pass proves nothing, the repetition is what makes
/// an ordering violation statistically visible.
///
/// # Panics
///
/// Panics (fatally, by design) if a trial records both readers seeing the
/// opposite cell update first, or if a spin cap is configured and an update
/// never becomes visible.
pub fn prove_single_total_order<T, S, L>(cfg: &TrialConfig, old: T, new: T, store: S, load: L)
where
    T: AtomicValue + Send,
    S: Fn(&AtomicCell<T>, T, T) + Sync,
    L: Fn(&AtomicCell<T>) -> T + Sync,
{
    if !cfg.threads_enabled() {
        // Single-threaded target: degrade to a trivial pass.
        return;
    }

    for trial in 0..cfg.trials {
        let x = AtomicCell::new(old);
        let y = AtomicCell::new(old);
        let flags = ObservationFlags::new();

        thread::scope(|s| {
            let x = &x;
            let y = &y;
            let flags = &flags;
            let store = &store;
            let load = &load;

            let handles = [
                s.spawn(move || store(x, old, new)),
                s.spawn(move || store(y, old, new)),
                s.spawn(move || {
                    wait_for_update(x, load, new, cfg, "x");
                    if load(y) != new {
                        flags.record_x_first();
                    }
                }),
                s.spawn(move || {
                    wait_for_update(y, load, new, cfg, "y");
                    if load(x) != new {
                        flags.record_y_first();
                    }
                }),
            ];

            // Join explicitly so a panicking thread surfaces its own
            // message instead of the scope's generic one.
            for handle in handles {
                if let Err(payload) = handle.join() {
                    std::panic::resume_unwind(payload);
                }
            }
        });

        assert!(
            !flags.contradiction(),
            "trial {trial}: readers disagree on the update order of two independent cells"
        );
    }
}

/// Spin until `load(cell)` observes `expected`.
fn wait_for_update<T, L>(cell: &AtomicCell<T>, load: &L, expected: T, cfg: &TrialConfig, which: &str)
where
    T: AtomicValue,
    L: Fn(&AtomicCell<T>) -> T,
{
    if let Err(timeout) = spin_until(|| load(cell) == expected, cfg.spin_cap) {
        panic!("cell {which}: update never became visible ({timeout})");
    }
}
