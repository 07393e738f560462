//! Integration test: weak compare-and-swap retry law.
//!
//! Repeatedly retrying a weak compare-and-swap with an unchanged
//! expected/desired pair and no intervening writer eventually succeeds
//! exactly once; every spurious failure before that is a no-op on the cell.

use memord_core::cell::AtomicCell;
use memord_core::order::MemOrder;

#[test]
fn weak_cas_succeeds_exactly_once_with_no_intervening_writer() {
    let cell = AtomicCell::new(0u32);
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        match cell.compare_exchange_weak(0, 1, MemOrder::SeqCst, MemOrder::Relaxed) {
            Ok(previous) => {
                assert_eq!(previous, 0);
                break;
            }
            Err(actual) => {
                // Spurious failure: the comparison did not actually differ,
                // and the cell is untouched.
                assert_eq!(actual, 0);
            }
        }
    }
    assert!(attempts >= 1);
    assert_eq!(cell.load(MemOrder::SeqCst), 1);

    // The same expected/desired pair now fails deterministically: the
    // update already landed, so retrying is a no-op.
    assert_eq!(
        cell.compare_exchange_weak(0, 1, MemOrder::SeqCst, MemOrder::Relaxed),
        Err(1)
    );
    assert_eq!(cell.load(MemOrder::SeqCst), 1);
}

#[test]
fn strong_cas_never_fails_spuriously() {
    let cell = AtomicCell::new(7i64);
    assert_eq!(
        cell.compare_exchange(7, 8, MemOrder::AcqRel, MemOrder::Acquire),
        Ok(7)
    );
    assert_eq!(
        cell.compare_exchange(7, 9, MemOrder::AcqRel, MemOrder::Acquire),
        Err(8)
    );
    assert_eq!(cell.load(MemOrder::SeqCst), 8);
}

#[test]
fn contended_weak_cas_retry_loops_all_land() {
    // Many threads race to append their increment through a retry loop;
    // every loop eventually lands exactly once, so the sum is exact.
    let cell = AtomicCell::new(0u64);
    let threads = 4u64;
    let increments = 1_000u64;
    std::thread::scope(|s| {
        for _ in 0..threads {
            s.spawn(|| {
                for _ in 0..increments {
                    let mut current = cell.load(MemOrder::Relaxed);
                    loop {
                        match cell.compare_exchange_weak(
                            current,
                            current + 1,
                            MemOrder::AcqRel,
                            MemOrder::Relaxed,
                        ) {
                            Ok(_) => break,
                            Err(actual) => current = actual,
                        }
                    }
                }
            });
        }
    });
    assert_eq!(cell.load(MemOrder::SeqCst), threads * increments);
}
