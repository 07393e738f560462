//! Memory-order model: six ordering modes and their mapping onto
//! `std::sync::atomic::Ordering` per operation position.
//!
//! The modes form a strict total order by synchronization strength:
//! relaxed < consume < acquire < release < acq-rel < seq-cst. `Consume` is
//! carried as a distinct mode (the enumeration under test has six members)
//! but maps to acquire at every use site, which is the standard
//! treat-consume-as-acquire rule.

use std::fmt;
use std::sync::atomic::Ordering;

/// Ordering/visibility contract attached to an atomic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemOrder {
    /// No ordering constraint beyond per-location coherence.
    Relaxed,
    /// Dependency ordering. Treated as acquire everywhere.
    Consume,
    /// Later operations on this thread see writes preceding the observed store.
    Acquire,
    /// Earlier writes on this thread become visible with the store.
    Release,
    /// Acquire on the read half, release on the write half of an RMW.
    AcqRel,
    /// Single global total order agreed by all observers.
    SeqCst,
}

impl MemOrder {
    /// All six modes, weakest first.
    pub const ALL: [MemOrder; 6] = [
        MemOrder::Relaxed,
        MemOrder::Consume,
        MemOrder::Acquire,
        MemOrder::Release,
        MemOrder::AcqRel,
        MemOrder::SeqCst,
    ];

    /// Numeric synchronization strength. Strictly increasing along [`ALL`].
    #[must_use]
    pub const fn strength(self) -> u8 {
        match self {
            Self::Relaxed => 0,
            Self::Consume => 1,
            Self::Acquire => 2,
            Self::Release => 3,
            Self::AcqRel => 4,
            Self::SeqCst => 5,
        }
    }

    /// `true` if `self` is at least as strong as `other`.
    #[must_use]
    pub const fn is_at_least(self, other: Self) -> bool {
        self.strength() >= other.strength()
    }

    /// Ordering to hand to a load.
    ///
    /// # Panics
    ///
    /// `Release` and `AcqRel` are not load orderings. Asking for one is a
    /// suite bug and aborts loudly; silently substituting a different
    /// strength would let a broken implementation borrow strength from the
    /// harness (or hide strength it has).
    #[must_use]
    pub fn load_ordering(self) -> Ordering {
        match self {
            Self::Relaxed => Ordering::Relaxed,
            Self::Consume | Self::Acquire => Ordering::Acquire,
            Self::SeqCst => Ordering::SeqCst,
            Self::Release | Self::AcqRel => {
                panic!("{self} is not a valid load ordering")
            }
        }
    }

    /// Ordering to hand to a store.
    ///
    /// # Panics
    ///
    /// `Consume`, `Acquire`, and `AcqRel` are not store orderings; see
    /// [`MemOrder::load_ordering`] for the policy.
    #[must_use]
    pub fn store_ordering(self) -> Ordering {
        match self {
            Self::Relaxed => Ordering::Relaxed,
            Self::Release => Ordering::Release,
            Self::SeqCst => Ordering::SeqCst,
            Self::Consume | Self::Acquire | Self::AcqRel => {
                panic!("{self} is not a valid store ordering")
            }
        }
    }

    /// Ordering to hand to a read-modify-write operation. All six modes
    /// are valid here.
    #[must_use]
    pub fn rmw_ordering(self) -> Ordering {
        match self {
            Self::Relaxed => Ordering::Relaxed,
            Self::Consume | Self::Acquire => Ordering::Acquire,
            Self::Release => Ordering::Release,
            Self::AcqRel => Ordering::AcqRel,
            Self::SeqCst => Ordering::SeqCst,
        }
    }

    /// Short lowercase label for reports, logs, and CLI filters.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Relaxed => "relaxed",
            Self::Consume => "consume",
            Self::Acquire => "acquire",
            Self::Release => "release",
            Self::AcqRel => "acq_rel",
            Self::SeqCst => "seq_cst",
        }
    }

    /// Parse a label (case-insensitive, accepts the common spellings).
    #[must_use]
    pub fn from_str_loose(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "relaxed" | "rlx" => Some(Self::Relaxed),
            "consume" => Some(Self::Consume),
            "acquire" | "acq" => Some(Self::Acquire),
            "release" | "rel" => Some(Self::Release),
            "acq_rel" | "acq-rel" | "acqrel" => Some(Self::AcqRel),
            "seq_cst" | "seq-cst" | "seqcst" => Some(Self::SeqCst),
            _ => None,
        }
    }
}

impl fmt::Display for MemOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strengths_form_a_strict_total_order() {
        for (i, a) in MemOrder::ALL.iter().enumerate() {
            for (j, b) in MemOrder::ALL.iter().enumerate() {
                if i == j {
                    assert_eq!(a.strength(), b.strength());
                } else {
                    assert_ne!(
                        a.strength(),
                        b.strength(),
                        "{a} and {b} must be strictly ordered"
                    );
                    assert_eq!(i < j, a.strength() < b.strength());
                }
            }
        }
    }

    #[test]
    fn relaxed_weakest_seq_cst_strongest() {
        for order in MemOrder::ALL {
            assert!(order.is_at_least(MemOrder::Relaxed));
            assert!(MemOrder::SeqCst.is_at_least(order));
        }
    }

    #[test]
    fn is_at_least_is_reflexive() {
        for order in MemOrder::ALL {
            assert!(order.is_at_least(order));
        }
    }

    #[test]
    fn consume_maps_to_acquire() {
        assert_eq!(MemOrder::Consume.load_ordering(), Ordering::Acquire);
        assert_eq!(MemOrder::Consume.rmw_ordering(), Ordering::Acquire);
    }

    #[test]
    fn valid_load_orderings_map_through() {
        assert_eq!(MemOrder::Relaxed.load_ordering(), Ordering::Relaxed);
        assert_eq!(MemOrder::Acquire.load_ordering(), Ordering::Acquire);
        assert_eq!(MemOrder::SeqCst.load_ordering(), Ordering::SeqCst);
    }

    #[test]
    fn valid_store_orderings_map_through() {
        assert_eq!(MemOrder::Relaxed.store_ordering(), Ordering::Relaxed);
        assert_eq!(MemOrder::Release.store_ordering(), Ordering::Release);
        assert_eq!(MemOrder::SeqCst.store_ordering(), Ordering::SeqCst);
    }

    #[test]
    fn rmw_accepts_all_six_modes() {
        for order in MemOrder::ALL {
            // Must not panic.
            let _ = order.rmw_ordering();
        }
    }

    #[test]
    #[should_panic(expected = "not a valid load ordering")]
    fn release_load_is_rejected() {
        let _ = MemOrder::Release.load_ordering();
    }

    #[test]
    #[should_panic(expected = "not a valid store ordering")]
    fn acquire_store_is_rejected() {
        let _ = MemOrder::Acquire.store_ordering();
    }

    #[test]
    fn labels_parse_back() {
        for order in MemOrder::ALL {
            assert_eq!(MemOrder::from_str_loose(order.label()), Some(order));
        }
        assert_eq!(MemOrder::from_str_loose("SEQ-CST"), Some(MemOrder::SeqCst));
        assert_eq!(MemOrder::from_str_loose("bogus"), None);
    }
}
