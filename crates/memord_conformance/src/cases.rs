//! The conformance case matrix.
//!
//! Every entry instantiates a prover with store/load closures bound to one
//! memory order and one atomic operation. The total-order invariant is
//! asserted only for seq-cst-bound closures (including the default-order
//! overloads); release/acquire pairs and stronger assert the publication
//! invariant. Relaxed publication runs as an unasserted negative control:
//! the suite does not claim relaxed ordering provides the happens-before
//! edge, and does not test for its absence either.

use memord_core::cell::AtomicCell;
use memord_core::order::MemOrder;
use memord_core::{atomic_value_enum, atomic_value_packed};
use memord_harness::report::CaseResult;
use memord_harness::spin::spin_until;
use memord_harness::{
    ConformanceReport, TrialConfig, prove_release_acquire_publication, prove_single_total_order,
    run_case,
};

// ---------------------------------------------------------------------------
// Element types beyond the primitives
// ---------------------------------------------------------------------------

/// Fieldless gate enum exercising the enum element-type surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum GatePhase {
    Idle = 0,
    Ready = 1,
}

atomic_value_enum!(GatePhase as u32 { GatePhase::Idle, GatePhase::Ready });

/// Two-field aggregate travelling through one 32-bit transport word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitWord {
    pub lo: u16,
    pub hi: u16,
}

atomic_value_packed!(
    SplitWord as u32,
    pack = |v: SplitWord| (u32::from(v.hi) << 16) | u32::from(v.lo),
    unpack = |bits: u32| SplitWord {
        lo: bits as u16,
        hi: (bits >> 16) as u16,
    }
);

// ---------------------------------------------------------------------------
// Registry types
// ---------------------------------------------------------------------------

/// Atomic operation standing in for the prover's "store" side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Store,
    Swap,
    CasStrong,
    CasWeak,
    FetchAdd,
    /// Single-argument store/load overloads pinned to the default order.
    DefaultOrder,
}

impl OpKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Store => "store",
            Self::Swap => "swap",
            Self::CasStrong => "cas_strong",
            Self::CasWeak => "cas_weak",
            Self::FetchAdd => "fetch_add",
            Self::DefaultOrder => "default_order",
        }
    }
}

/// Which prover a case drives, and with what claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProverKind {
    /// Sequential-consistency prover: asserts the single-total-order
    /// invariant.
    TotalOrder,
    /// Publication prover: asserts release/acquire visibility of a plain
    /// write.
    Publication,
    /// Publication shape under relaxed ordering; asserts completion only.
    PublicationControl,
}

impl ProverKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TotalOrder => "total_order",
            Self::Publication => "publication",
            Self::PublicationControl => "publication_control",
        }
    }
}

/// One registered conformance case.
pub struct ConformanceCase {
    pub name: &'static str,
    pub prover: ProverKind,
    /// Store-side memory order.
    pub order: MemOrder,
    /// Load-side memory order.
    pub load_order: MemOrder,
    pub op: OpKind,
    pub cell_type: &'static str,
    run: fn(&TrialConfig),
}

impl ConformanceCase {
    /// Execute the case. Aborts (panics) on a conformance violation.
    pub fn run(&self, cfg: &TrialConfig) {
        (self.run)(cfg);
    }
}

/// Run a set of cases and collect a report. Prover aborts are recorded as
/// failing results rather than tearing the run down mid-matrix.
pub fn run_cases(cfg: &TrialConfig, cases: &[ConformanceCase], title: &str) -> ConformanceReport {
    let mut report = ConformanceReport::new(title, cfg.trials);
    for case in cases {
        let outcome = run_case(|| case.run(cfg));
        report.push(CaseResult {
            name: case.name.to_string(),
            order: case.order.label().to_string(),
            operation: case.op.label().to_string(),
            cell_type: case.cell_type.to_string(),
            passed: outcome.passed,
            detail: outcome.detail,
            duration_ms: outcome.duration_ms,
        });
    }
    report
}

// ---------------------------------------------------------------------------
// Total-order cases (seq-cst closures)
// ---------------------------------------------------------------------------

fn sc_store_u32(cfg: &TrialConfig) {
    prove_single_total_order(
        cfg,
        0u32,
        1,
        |cell, _old, new| cell.store(new, MemOrder::SeqCst),
        |cell| cell.load(MemOrder::SeqCst),
    );
}

fn sc_store_bool(cfg: &TrialConfig) {
    prove_single_total_order(
        cfg,
        false,
        true,
        |cell, _old, new| cell.store(new, MemOrder::SeqCst),
        |cell| cell.load(MemOrder::SeqCst),
    );
}

fn sc_store_f64(cfg: &TrialConfig) {
    prove_single_total_order(
        cfg,
        0.0f64,
        1.5,
        |cell, _old, new| cell.store(new, MemOrder::SeqCst),
        |cell| cell.load(MemOrder::SeqCst),
    );
}

fn sc_swap_u64(cfg: &TrialConfig) {
    prove_single_total_order(
        cfg,
        0u64,
        1,
        |cell, _old, new| {
            cell.swap(new, MemOrder::SeqCst);
        },
        |cell| cell.load(MemOrder::SeqCst),
    );
}

fn sc_cas_strong_i32(cfg: &TrialConfig) {
    prove_single_total_order(
        cfg,
        0i32,
        1,
        |cell, old, new| {
            // Sole writer to this cell; a strong CAS from the initial value
            // cannot fail.
            assert!(
                cell.compare_exchange(old, new, MemOrder::SeqCst, MemOrder::Relaxed)
                    .is_ok(),
                "compare-exchange failed with no competing writer"
            );
        },
        |cell| cell.load(MemOrder::SeqCst),
    );
}

fn sc_cas_weak_u8(cfg: &TrialConfig) {
    prove_single_total_order(
        cfg,
        0u8,
        1,
        |cell, old, new| {
            // A weak compare-and-swap may fail spuriously; retry until it lands.
            while cell
                .compare_exchange_weak(old, new, MemOrder::SeqCst, MemOrder::Relaxed)
                .is_err()
            {}
        },
        |cell| cell.load(MemOrder::SeqCst),
    );
}

fn sc_fetch_add_usize(cfg: &TrialConfig) {
    prove_single_total_order(
        cfg,
        0usize,
        1,
        |cell, _old, _new| {
            cell.fetch_add(1, MemOrder::SeqCst);
        },
        |cell| cell.load(MemOrder::SeqCst),
    );
}

fn sc_default_order_u32(cfg: &TrialConfig) {
    prove_single_total_order(
        cfg,
        0u32,
        1,
        |cell, _old, new| cell.store_default(new),
        |cell| cell.load_default(),
    );
}

// ---------------------------------------------------------------------------
// Publication cases (release-or-stronger store, acquire-or-stronger load)
// ---------------------------------------------------------------------------

fn pub_release_acquire_i32(cfg: &TrialConfig) {
    prove_release_acquire_publication(
        cfg,
        0i32,
        1,
        |cell, _old, new| cell.store(new, MemOrder::Release),
        |cell| cell.load(MemOrder::Acquire),
    );
}

fn pub_release_acquire_bool(cfg: &TrialConfig) {
    prove_release_acquire_publication(
        cfg,
        false,
        true,
        |cell, _old, new| cell.store(new, MemOrder::Release),
        |cell| cell.load(MemOrder::Acquire),
    );
}

fn pub_release_acquire_enum(cfg: &TrialConfig) {
    prove_release_acquire_publication(
        cfg,
        GatePhase::Idle,
        GatePhase::Ready,
        |cell, _old, new| cell.store(new, MemOrder::Release),
        |cell| cell.load(MemOrder::Acquire),
    );
}

fn pub_release_acquire_packed(cfg: &TrialConfig) {
    prove_release_acquire_publication(
        cfg,
        SplitWord { lo: 0, hi: 0 },
        SplitWord {
            lo: 0xBEEF,
            hi: 0xDEAD,
        },
        |cell, _old, new| cell.store(new, MemOrder::Release),
        |cell| cell.load(MemOrder::Acquire),
    );
}

fn pub_swap_acq_rel_u32(cfg: &TrialConfig) {
    prove_release_acquire_publication(
        cfg,
        0u32,
        1,
        |cell, _old, new| {
            cell.swap(new, MemOrder::AcqRel);
        },
        |cell| cell.load(MemOrder::Acquire),
    );
}

fn pub_cas_strong_release_u32(cfg: &TrialConfig) {
    prove_release_acquire_publication(
        cfg,
        0u32,
        1,
        |cell, old, new| {
            assert!(
                cell.compare_exchange(old, new, MemOrder::Release, MemOrder::Relaxed)
                    .is_ok(),
                "compare-exchange failed with no competing writer"
            );
        },
        |cell| cell.load(MemOrder::Acquire),
    );
}

fn pub_cas_weak_release_u16(cfg: &TrialConfig) {
    prove_release_acquire_publication(
        cfg,
        0u16,
        1,
        |cell, old, new| {
            while cell
                .compare_exchange_weak(old, new, MemOrder::Release, MemOrder::Relaxed)
                .is_err()
            {}
        },
        |cell| cell.load(MemOrder::Acquire),
    );
}

fn pub_fetch_add_release_u64(cfg: &TrialConfig) {
    prove_release_acquire_publication(
        cfg,
        0u64,
        1,
        |cell, _old, _new| {
            cell.fetch_add(1, MemOrder::Release);
        },
        |cell| cell.load(MemOrder::Acquire),
    );
}

fn pub_seq_cst_u32(cfg: &TrialConfig) {
    prove_release_acquire_publication(
        cfg,
        0u32,
        1,
        |cell, _old, new| cell.store(new, MemOrder::SeqCst),
        |cell| cell.load(MemOrder::SeqCst),
    );
}

fn pub_default_order_i64(cfg: &TrialConfig) {
    prove_release_acquire_publication(
        cfg,
        0i64,
        1,
        |cell, _old, new| cell.store_default(new),
        |cell| cell.load_default(),
    );
}

/// Relaxed store/load on the gate only. Relaxed ordering makes no
/// publication promise, so nothing beyond trial completion is asserted;
/// per-location coherence still guarantees the gate update itself becomes
/// visible eventually.
fn pub_relaxed_control_u32(cfg: &TrialConfig) {
    if !cfg.threads_enabled() {
        return;
    }
    for _ in 0..cfg.trials {
        let gate = AtomicCell::new(0u32);
        std::thread::scope(|s| {
            let gate = &gate;
            let readers: Vec<_> = (0..cfg.publish_readers)
                .map(|reader| {
                    s.spawn(move || {
                        if let Err(timeout) =
                            spin_until(|| gate.load(MemOrder::Relaxed) == 1, cfg.spin_cap)
                        {
                            panic!(
                                "reader {reader}: relaxed gate update never became visible ({timeout})"
                            );
                        }
                    })
                })
                .collect();
            gate.store(1, MemOrder::Relaxed);
            for handle in readers {
                if let Err(payload) = handle.join() {
                    std::panic::resume_unwind(payload);
                }
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Every registered conformance case, total-order matrix first.
#[must_use]
pub fn all_cases() -> Vec<ConformanceCase> {
    use MemOrder::{AcqRel, Acquire, Relaxed, Release, SeqCst};
    use OpKind::{CasStrong, CasWeak, DefaultOrder, FetchAdd, Store, Swap};
    use ProverKind::{Publication, PublicationControl, TotalOrder};

    let case = |name, prover, order, load_order, op, cell_type, run: fn(&TrialConfig)| {
        ConformanceCase {
            name,
            prover,
            order,
            load_order,
            op,
            cell_type,
            run,
        }
    };

    vec![
        case("total_order/store/u32", TotalOrder, SeqCst, SeqCst, Store, "u32", sc_store_u32),
        case("total_order/store/bool", TotalOrder, SeqCst, SeqCst, Store, "bool", sc_store_bool),
        case("total_order/store/f64", TotalOrder, SeqCst, SeqCst, Store, "f64", sc_store_f64),
        case("total_order/swap/u64", TotalOrder, SeqCst, SeqCst, Swap, "u64", sc_swap_u64),
        case("total_order/cas_strong/i32", TotalOrder, SeqCst, SeqCst, CasStrong, "i32", sc_cas_strong_i32),
        case("total_order/cas_weak/u8", TotalOrder, SeqCst, SeqCst, CasWeak, "u8", sc_cas_weak_u8),
        case("total_order/fetch_add/usize", TotalOrder, SeqCst, SeqCst, FetchAdd, "usize", sc_fetch_add_usize),
        case("total_order/default_order/u32", TotalOrder, SeqCst, SeqCst, DefaultOrder, "u32", sc_default_order_u32),
        case("publication/store/i32", Publication, Release, Acquire, Store, "i32", pub_release_acquire_i32),
        case("publication/store/bool", Publication, Release, Acquire, Store, "bool", pub_release_acquire_bool),
        case("publication/store/enum", Publication, Release, Acquire, Store, "GatePhase", pub_release_acquire_enum),
        case("publication/store/packed", Publication, Release, Acquire, Store, "SplitWord", pub_release_acquire_packed),
        case("publication/swap/u32", Publication, AcqRel, Acquire, Swap, "u32", pub_swap_acq_rel_u32),
        case("publication/cas_strong/u32", Publication, Release, Acquire, CasStrong, "u32", pub_cas_strong_release_u32),
        case("publication/cas_weak/u16", Publication, Release, Acquire, CasWeak, "u16", pub_cas_weak_release_u16),
        case("publication/fetch_add/u64", Publication, Release, Acquire, FetchAdd, "u64", pub_fetch_add_release_u64),
        case("publication/store/seq_cst/u32", Publication, SeqCst, SeqCst, Store, "u32", pub_seq_cst_u32),
        case("publication/default_order/i64", Publication, SeqCst, SeqCst, DefaultOrder, "i64", pub_default_order_i64),
        case("publication_control/relaxed/u32", PublicationControl, Relaxed, Relaxed, Store, "u32", pub_relaxed_control_u32),
    ]
}
