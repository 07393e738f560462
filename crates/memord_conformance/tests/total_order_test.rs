//! Integration test: sequential-consistency prover at reference settings.
//!
//! Two atomic integer cells both start at 0; writer threads set them to 1
//! under sequentially-consistent stores; two reader threads spin until they
//! observe 1 and immediately check the other cell. Across 100 trials, no
//! trial may record both readers disagreeing on the update order.

use memord_conformance::{ProverKind, all_cases};
use memord_core::order::MemOrder;
use memord_harness::{ThreadPolicy, TrialConfig, prove_single_total_order};

fn reference_config() -> TrialConfig {
    TrialConfig::default().with_threads(ThreadPolicy::Enabled)
}

#[test]
fn seq_cst_stores_keep_one_global_order_across_100_trials() {
    prove_single_total_order(
        &reference_config(),
        0u32,
        1,
        |cell, _old, new| cell.store(new, MemOrder::SeqCst),
        |cell| cell.load(MemOrder::SeqCst),
    );
}

#[test]
fn default_order_overloads_are_as_strong_as_explicit_seq_cst() {
    prove_single_total_order(
        &reference_config(),
        0u32,
        1,
        |cell, _old, new| cell.store_default(new),
        |cell| cell.load_default(),
    );
}

#[test]
fn seq_cst_compare_and_swap_stands_in_for_store() {
    prove_single_total_order(
        &reference_config(),
        0u64,
        1,
        |cell, old, new| {
            assert!(
                cell.compare_exchange(old, new, MemOrder::SeqCst, MemOrder::Relaxed)
                    .is_ok(),
                "compare-exchange failed with no competing writer"
            );
        },
        |cell| cell.load(MemOrder::SeqCst),
    );
}

#[test]
fn seq_cst_weak_compare_and_swap_retries_until_it_lands() {
    prove_single_total_order(
        &reference_config(),
        0u8,
        1,
        |cell, old, new| {
            while cell
                .compare_exchange_weak(old, new, MemOrder::SeqCst, MemOrder::Relaxed)
                .is_err()
            {}
        },
        |cell| cell.load(MemOrder::SeqCst),
    );
}

#[test]
fn seq_cst_fetch_add_stands_in_for_store() {
    prove_single_total_order(
        &reference_config(),
        0i64,
        1,
        |cell, _old, _new| {
            cell.fetch_add(1, MemOrder::SeqCst);
        },
        |cell| cell.load(MemOrder::SeqCst),
    );
}

#[test]
fn registered_total_order_cases_pass_at_quick_settings() {
    let cfg = TrialConfig::quick().with_threads(ThreadPolicy::Enabled);
    for case in all_cases()
        .iter()
        .filter(|c| c.prover == ProverKind::TotalOrder)
    {
        case.run(&cfg);
    }
}
