//! Report generation for conformance results.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Outcome of a single conformance case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    pub name: String,
    /// Memory-order label the case's store side was bound to.
    pub order: String,
    /// Atomic operation standing in for "store" (store, swap, cas, ...).
    pub operation: String,
    /// Element type held by the cell under test.
    pub cell_type: String,
    pub passed: bool,
    /// Panic message for failed cases.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub duration_ms: u64,
}

/// Pass/fail tallies across a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

/// A conformance report for one suite run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    pub title: String,
    /// Trials each prover invocation ran.
    pub trials: u32,
    /// Timestamp (UTC).
    pub timestamp: String,
    pub summary: Summary,
    pub results: Vec<CaseResult>,
}

impl ConformanceReport {
    #[must_use]
    pub fn new(title: impl Into<String>, trials: u32) -> Self {
        Self {
            title: title.into(),
            trials,
            timestamp: crate::structured_log::now_utc(),
            summary: Summary::default(),
            results: Vec::new(),
        }
    }

    /// Record one case result, updating the summary tallies.
    pub fn push(&mut self, result: CaseResult) {
        self.summary.total += 1;
        if result.passed {
            self.summary.passed += 1;
        } else {
            self.summary.failed += 1;
        }
        self.results.push(result);
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.summary.failed == 0
    }

    /// Render the report as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!("- Timestamp: {}\n", self.timestamp));
        out.push_str(&format!("- Trials per case: {}\n", self.trials));
        out.push_str(&format!("- Total: {}\n", self.summary.total));
        out.push_str(&format!("- Passed: {}\n", self.summary.passed));
        out.push_str(&format!("- Failed: {}\n\n", self.summary.failed));

        out.push_str("| Case | Order | Operation | Cell | Status |\n");
        out.push_str("|------|-------|-----------|------|--------|\n");
        for r in &self.results {
            let status = if r.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                r.name, r.order, r.operation, r.cell_type, status
            ));
        }
        out
    }

    /// Render the report as pretty JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }

    /// SHA-256 hex digest over the compact JSON rendering, for artifact
    /// integrity checks downstream.
    #[must_use]
    pub fn digest(&self) -> String {
        let canonical = serde_json::to_string(self).unwrap_or_default();
        let bytes = Sha256::digest(canonical.as_bytes());
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result(name: &str, passed: bool) -> CaseResult {
        CaseResult {
            name: name.to_string(),
            order: "seq_cst".to_string(),
            operation: "store".to_string(),
            cell_type: "u32".to_string(),
            passed,
            detail: (!passed).then(|| "readers disagree".to_string()),
            duration_ms: 3,
        }
    }

    #[test]
    fn push_updates_summary_tallies() {
        let mut report = ConformanceReport::new("smoke", 100);
        report.push(sample_result("a", true));
        report.push(sample_result("b", false));
        assert_eq!(
            report.summary,
            Summary {
                total: 2,
                passed: 1,
                failed: 1
            }
        );
        assert!(!report.all_passed());
    }

    #[test]
    fn markdown_lists_every_case() {
        let mut report = ConformanceReport::new("smoke", 100);
        report.push(sample_result("total_order/store", true));
        let md = report.to_markdown();
        assert!(md.contains("# smoke"));
        assert!(md.contains("| total_order/store | seq_cst | store | u32 | PASS |"));
    }

    #[test]
    fn json_round_trips() {
        let mut report = ConformanceReport::new("smoke", 16);
        report.push(sample_result("a", false));
        let parsed: ConformanceReport = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(parsed.summary.failed, 1);
        assert_eq!(parsed.results[0].detail.as_deref(), Some("readers disagree"));
    }

    #[test]
    fn digest_is_hex_and_tracks_content() {
        let mut a = ConformanceReport::new("smoke", 16);
        a.timestamp = "t".to_string();
        let mut b = a.clone();
        assert_eq!(a.digest(), b.digest());
        assert_eq!(a.digest().len(), 64);
        assert!(a.digest().chars().all(|c| c.is_ascii_hexdigit()));

        b.push(sample_result("a", true));
        assert_ne!(a.digest(), b.digest());
    }
}
