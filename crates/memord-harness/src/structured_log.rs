//! Structured JSONL logging for conformance runs.
//!
//! Provides:
//! - [`LogEntry`]: canonical JSONL log record with required + optional fields.
//! - [`LogEmitter`]: writes JSONL lines to a file or stderr.
//! - [`validate_log_line`] / [`validate_log_file`]: schema checks for
//!   emitted logs, so downstream tooling can trust the stream.

use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Severity level for log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Case outcome carried in run logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Skip,
    Timeout,
}

/// Canonical structured log entry.
///
/// Required fields: `timestamp`, `trace_id`, `level`, `event`. Optional
/// fields carry conformance-run context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    // Required
    pub timestamp: String,
    pub trace_id: String,
    pub level: LogLevel,
    pub event: String,

    // Optional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trials: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readers: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl LogEntry {
    /// Create a new log entry with required fields only.
    #[must_use]
    pub fn new(trace_id: impl Into<String>, level: LogLevel, event: impl Into<String>) -> Self {
        Self {
            timestamp: now_utc(),
            trace_id: trace_id.into(),
            level,
            event: event.into(),
            order: None,
            operation: None,
            cell_type: None,
            trials: None,
            readers: None,
            outcome: None,
            duration_ms: None,
            detail: None,
        }
    }

    #[must_use]
    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    #[must_use]
    pub fn with_cell_type(mut self, cell_type: impl Into<String>) -> Self {
        self.cell_type = Some(cell_type.into());
        self
    }

    #[must_use]
    pub fn with_trials(mut self, trials: u32) -> Self {
        self.trials = Some(trials);
        self
    }

    #[must_use]
    pub fn with_readers(mut self, readers: usize) -> Self {
        self.readers = Some(readers);
        self
    }

    #[must_use]
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    #[must_use]
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Serialize to a single JSONL line (no trailing newline).
    pub fn to_jsonl(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Writes JSONL log lines to a file or stderr.
pub struct LogEmitter {
    out: Box<dyn Write + Send>,
    trace_id: String,
}

impl LogEmitter {
    /// Emit to a file, truncating any previous content.
    pub fn to_file(path: &Path, trace_id: impl Into<String>) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self {
            out: Box::new(BufWriter::new(file)),
            trace_id: trace_id.into(),
        })
    }

    /// Emit to stderr.
    #[must_use]
    pub fn to_stderr(trace_id: impl Into<String>) -> Self {
        Self {
            out: Box::new(std::io::stderr()),
            trace_id: trace_id.into(),
        }
    }

    /// Emit a minimal entry with this emitter's trace id.
    pub fn emit(&mut self, level: LogLevel, event: &str) -> std::io::Result<()> {
        let entry = LogEntry::new(self.trace_id.clone(), level, event);
        self.emit_entry(entry)
    }

    /// Emit a full entry. An empty `trace_id` is filled in from the emitter.
    pub fn emit_entry(&mut self, mut entry: LogEntry) -> std::io::Result<()> {
        if entry.trace_id.is_empty() {
            entry.trace_id = self.trace_id.clone();
        }
        let line = entry.to_jsonl().map_err(std::io::Error::other)?;
        writeln!(self.out, "{line}")
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.out.flush()
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate one JSONL line against the schema. `idx` is the zero-based line
/// number, used in error messages.
pub fn validate_log_line(line: &str, idx: usize) -> Result<(), String> {
    let value: serde_json::Value =
        serde_json::from_str(line).map_err(|e| format!("line {idx}: not valid JSON: {e}"))?;

    for field in ["timestamp", "trace_id", "event"] {
        match value.get(field) {
            Some(serde_json::Value::String(s)) if !s.is_empty() => {}
            _ => return Err(format!("line {idx}: missing or empty field `{field}`")),
        }
    }

    match value.get("level") {
        Some(serde_json::Value::String(s))
            if matches!(s.as_str(), "trace" | "debug" | "info" | "warn" | "error") => {}
        _ => return Err(format!("line {idx}: missing or unknown `level`")),
    }

    Ok(())
}

/// Validate an entire JSONL file. Returns the line count and any errors.
pub fn validate_log_file(path: &Path) -> std::io::Result<(usize, Vec<String>)> {
    let content = std::fs::read_to_string(path)?;
    let mut count = 0;
    let mut errors = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        count += 1;
        if let Err(e) = validate_log_line(line, idx) {
            errors.push(e);
        }
    }
    Ok((count, errors))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Approximate UTC timestamp without an external time dependency. Good
/// enough for log ordering and report headers.
pub(crate) fn now_utc() -> String {
    let duration = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        1970 + secs / 31_557_600,
        (secs % 31_557_600) / 2_629_800 + 1,
        (secs % 2_629_800) / 86400 + 1,
        (secs % 86400) / 3600,
        (secs % 3600) / 60,
        secs % 60,
        millis,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_serializes_required_fields_and_omits_absent_options() {
        let entry = LogEntry::new("memord::test::1", LogLevel::Info, "run_start");
        let json = entry.to_jsonl().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["timestamp"].is_string());
        assert_eq!(parsed["trace_id"], "memord::test::1");
        assert_eq!(parsed["level"], "info");
        assert_eq!(parsed["event"], "run_start");
        assert!(parsed.get("order").is_none());
        assert!(parsed.get("outcome").is_none());
    }

    #[test]
    fn builder_fields_appear_in_the_line() {
        let entry = LogEntry::new("t", LogLevel::Info, "case_end")
            .with_order("seq_cst")
            .with_operation("cas_weak")
            .with_cell_type("u32")
            .with_trials(100)
            .with_readers(8)
            .with_outcome(Outcome::Pass)
            .with_duration_ms(12);
        let parsed: serde_json::Value =
            serde_json::from_str(&entry.to_jsonl().unwrap()).unwrap();
        assert_eq!(parsed["order"], "seq_cst");
        assert_eq!(parsed["operation"], "cas_weak");
        assert_eq!(parsed["trials"], 100);
        assert_eq!(parsed["readers"], 8);
        assert_eq!(parsed["outcome"], "pass");
        assert_eq!(parsed["duration_ms"], 12);
    }

    #[test]
    fn emitter_writes_valid_jsonl() {
        let dir = std::env::temp_dir().join("memord_log_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.jsonl");

        {
            let mut emitter = LogEmitter::to_file(&path, "memord::test").unwrap();
            emitter.emit(LogLevel::Info, "run_start").unwrap();
            emitter
                .emit_entry(
                    LogEntry::new("", LogLevel::Info, "case_end")
                        .with_order("release")
                        .with_outcome(Outcome::Pass),
                )
                .unwrap();
            emitter.flush().unwrap();
        }

        let (count, errors) = validate_log_file(&path).unwrap();
        assert_eq!(count, 2);
        assert!(errors.is_empty(), "validation errors: {errors:?}");

        let content = std::fs::read_to_string(&path).unwrap();
        // The emitter fills in an empty trace id.
        assert!(content.lines().all(|l| l.contains("memord::test")));
    }

    #[test]
    fn validator_rejects_broken_lines() {
        assert!(validate_log_line("not json", 0).is_err());
        assert!(validate_log_line(r#"{"timestamp":"t","trace_id":"x"}"#, 1).is_err());
        assert!(
            validate_log_line(
                r#"{"timestamp":"t","trace_id":"x","level":"loud","event":"e"}"#,
                2
            )
            .is_err()
        );
        assert!(
            validate_log_line(
                r#"{"timestamp":"t","trace_id":"x","level":"info","event":"e"}"#,
                3
            )
            .is_ok()
        );
    }
}
