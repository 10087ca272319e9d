//! Run-level aggregation and reporting.

use netverify_core::diff::{render_human_summary, DocumentDiff};
use netverify_core::policy::Verdict;
use serde::{Deserialize, Serialize};

/// One verdict attached to a (device, state-kind, member, rule) key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictRecord {
    pub device: String,
    pub kind: String,
    /// Sub-entity (interface name); absent for device/kind-level checks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    pub rule: String,
    pub verdict: Verdict,
}

/// A non-empty structural diff for one (device, kind).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffRecord {
    pub device: String,
    pub kind: String,
    pub diff: DocumentDiff,
}

/// Aggregate of all verdicts for one stage.
///
/// Terminal state of the engine's execution: immutable once the run
/// completes. Overall success is the conjunction of all verdicts being
/// pass or skip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Stage label: `pre`, `post`, or `check`
    pub stage: String,
    /// RFC 3339 timestamp taken at run start
    pub started_at: String,
    pub records: Vec<VerdictRecord>,
    /// Structural diffs backing the config-match failures
    pub diffs: Vec<DiffRecord>,
}

impl RunReport {
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            started_at: chrono::Utc::now().to_rfc3339(),
            records: Vec::new(),
            diffs: Vec::new(),
        }
    }

    pub fn pass_count(&self) -> usize {
        self.records.iter().filter(|r| r.verdict.is_pass()).count()
    }

    pub fn fail_count(&self) -> usize {
        self.records.iter().filter(|r| r.verdict.is_fail()).count()
    }

    pub fn skip_count(&self) -> usize {
        self.records.iter().filter(|r| r.verdict.is_skip()).count()
    }

    /// True when no verdict failed.
    pub fn succeeded(&self) -> bool {
        !self.records.iter().any(|r| r.verdict.is_fail())
    }

    /// Render the report as reviewer-facing text.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Run stage: {}\n", self.stage));
        for record in &self.records {
            let status = match &record.verdict {
                Verdict::Pass => "PASS",
                Verdict::Fail { .. } => "FAIL",
                Verdict::Skip { .. } => "SKIP",
            };
            let member = record.member.as_deref().unwrap_or("-");
            match record.verdict.reason() {
                Some(reason) => out.push_str(&format!(
                    "{status} {} {} {} {}: {}\n",
                    record.device, record.kind, member, record.rule, reason
                )),
                None => out.push_str(&format!(
                    "{status} {} {} {} {}\n",
                    record.device, record.kind, member, record.rule
                )),
            }
        }
        for diff in &self.diffs {
            out.push_str(&format!("\nDiff for {} {}:\n", diff.device, diff.kind));
            out.push_str(&render_human_summary(&diff.diff));
        }
        out.push_str(&format!(
            "\nSummary: {} pass, {} fail, {} skip\n",
            self.pass_count(),
            self.fail_count(),
            self.skip_count()
        ));
        out
    }
}
