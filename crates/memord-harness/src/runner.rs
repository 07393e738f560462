//! Case execution.
//!
//! Inside `cargo test`, a prover abort is simply the failing test. The CLI
//! instead runs each case through [`run_case`], which records the abort and
//! lets the run finish its report before the process exits non-zero; one
//! broken order should not hide the rest of the matrix.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;

/// Result of executing one registered case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseOutcome {
    pub passed: bool,
    /// Panic message when the case aborted.
    pub detail: Option<String>,
    pub duration_ms: u64,
}

/// Run one case to completion, converting a prover abort into a recorded
/// failure.
pub fn run_case(case: impl FnOnce()) -> CaseOutcome {
    let start = Instant::now();
    // Cases only touch per-trial state that dies with the panic, so
    // observing it afterwards is not possible.
    let result = catch_unwind(AssertUnwindSafe(case));
    let duration_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(()) => CaseOutcome {
            passed: true,
            detail: None,
            duration_ms,
        },
        Err(payload) => CaseOutcome {
            passed: false,
            detail: Some(panic_message(payload.as_ref())),
            duration_ms,
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
