//! # memord-core
//!
//! Memory locations and the memory-order model validated by the memord
//! conformance suite.
//!
//! This crate deliberately adds nothing on top of the hardware atomics it
//! wraps: [`cell::AtomicCell`] is a thin typed facade over a single
//! std atomic of matching width, and [`plain::PlainCell`] is an ordinary
//! unsynchronized location. Any extra lock or fence here would mask exactly
//! the reordering the provers in `memord-harness` exist to detect.

#![deny(unsafe_code)]

pub mod cell;
pub mod instrument;
pub mod order;
#[allow(unsafe_code)]
pub mod plain;

pub use cell::{AtomicCell, AtomicValue};
pub use order::MemOrder;
pub use plain::PlainCell;
