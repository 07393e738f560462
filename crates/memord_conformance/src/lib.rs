//! Conformance case registry for the memord suite.
//!
//! Each case binds one of the two provers to concrete store/load closures
//! for a specific memory order and atomic operation, across a spread of
//! element types. The registry is data the CLI and the integration tests
//! share; the provers themselves live in `memord-harness`.

pub mod cases;

pub use cases::{
    ConformanceCase, GatePhase, OpKind, ProverKind, SplitWord, all_cases, run_cases,
};
