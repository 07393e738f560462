//! Integration test: threads-unavailable mode.
//!
//! On targets without thread support the provers degrade to a trivial
//! pass: the suite stays usable, and "no trial ran" is an intentional,
//! documented simplification rather than a failure.

use memord_core::order::MemOrder;
use memord_harness::{
    ThreadPolicy, TrialConfig, prove_release_acquire_publication, prove_single_total_order,
    run_case,
};

#[test]
fn total_order_prover_is_a_no_op_without_threads() {
    // With threads enabled this configuration would spin effectively
    // forever; returning at all proves no trial ran.
    let cfg = TrialConfig::default()
        .with_trials(u32::MAX)
        .with_threads(ThreadPolicy::Disabled);
    prove_single_total_order(
        &cfg,
        0u32,
        1,
        |cell, _old, new| cell.store(new, MemOrder::SeqCst),
        |cell| cell.load(MemOrder::SeqCst),
    );
}

#[test]
fn publication_prover_is_a_no_op_without_threads() {
    let cfg = TrialConfig::default()
        .with_trials(u32::MAX)
        .with_threads(ThreadPolicy::Disabled);
    prove_release_acquire_publication(
        &cfg,
        0u32,
        1,
        |cell, _old, new| cell.store(new, MemOrder::Release),
        |cell| cell.load(MemOrder::Acquire),
    );
}

#[test]
fn degraded_registry_run_passes_every_case() {
    let cfg = TrialConfig::default()
        .with_trials(u32::MAX)
        .with_threads(ThreadPolicy::Disabled);
    let report = memord_conformance::run_cases(
        &cfg,
        &memord_conformance::all_cases(),
        "degraded smoke",
    );
    assert!(report.all_passed());
    assert_eq!(report.summary.total, memord_conformance::all_cases().len());
}

#[test]
fn runner_records_an_aborting_case_instead_of_tearing_down() {
    let outcome = run_case(|| panic!("trial 3: readers disagree"));
    assert!(!outcome.passed);
    assert!(
        outcome
            .detail
            .as_deref()
            .is_some_and(|d| d.contains("readers disagree"))
    );
}
