//! Error taxonomy for the harness I/O surfaces.
//!
//! Ordering-invariant violations never appear here: a conformance
//! violation is a fatal assertion inside a prover, not a value that
//! crosses the prover boundary. These variants cover the runner, report,
//! and CLI surfaces only.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown memory order: {0}")]
    UnknownOrder(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
