//! Stage orchestration.
//!
//! State machine over a single run:
//! `Init → (CaptureOnly | CaptureAndCompare) → Aggregated → Done`.
//! `Init` validates stage directories before any capture work; each
//! (device, kind) unit then runs independently on a bounded worker pool,
//! and the per-unit verdicts are aggregated into the run result.

use crate::report::{DiffRecord, RunReport, VerdictRecord};
use netverify_capture::{CaptureSource, Device, Inventory};
use netverify_core::diff::diff_documents;
use netverify_core::errors::{NvError, Result};
use netverify_core::kinds::{CheckMode, StateKind};
use netverify_core::normalize::{default_rules, normalize, NormalizeRule};
use netverify_core::policy::{check_must_be_empty, evaluate_interfaces, ExclusionList, Verdict};
use netverify_store::{SnapshotStore, StageDir, WriteOutcome};
use rayon::prelude::*;
use std::path::PathBuf;

/// Rule labels for device/kind-level checks that sit outside the
/// per-interface rule set.
const RULE_CAPTURE: &str = "capture";
const RULE_SNAPSHOT: &str = "snapshot";
const RULE_BASELINE: &str = "baseline";
const RULE_CONFIG_MATCH: &str = "config-match";
const RULE_CONFIG_EMPTY: &str = "config-empty";
const RULE_RECORD_SHAPE: &str = "record-shape";

/// How this run executes, fixed once at startup.
#[derive(Debug, Clone)]
pub enum RunMode {
    /// Baseline capture: persist snapshots, no evaluation
    CaptureOnly,
    /// Capture, then compare each snapshot against the paired baseline
    CaptureAndCompare { baseline: StageDir },
}

impl RunMode {
    fn stage_label(&self) -> &'static str {
        match self {
            RunMode::CaptureOnly => "pre",
            RunMode::CaptureAndCompare { .. } => "post",
        }
    }
}

/// Configuration for one verification run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory snapshots for this stage are written to
    pub report_dir: PathBuf,
    /// Paired pre-stage directory; absence designates a pre-only run
    pub baseline_dir: Option<PathBuf>,
    /// Upper bound on concurrently processed (device, kind) units
    pub max_concurrency: Option<usize>,
    /// When true, devices are not required to be marked connected
    pub offline: bool,
}

/// Execute one verification run over the whole fleet.
///
/// Every (device, kind) unit is isolated: capture, snapshot, or baseline
/// failure for one unit is recorded as a verdict and never aborts the
/// others.
///
/// # Errors
///
/// - `Precondition` — post requested without a valid pre directory, or
///   the report directory could not be created
/// - `Internal` — the worker pool could not be built
pub fn execute(
    inventory: &Inventory,
    source: &dyn CaptureSource,
    config: &RunConfig,
) -> Result<RunReport> {
    // Init: validate stage directories before any capture work begins.
    let mode = match &config.baseline_dir {
        Some(dir) => RunMode::CaptureAndCompare {
            baseline: StageDir::require(dir)?,
        },
        None => RunMode::CaptureOnly,
    };
    let report_stage = StageDir::ensure(&config.report_dir)?;

    let kinds = StateKind::tracked();
    let exclusions = ExclusionList::default();
    let rules = default_rules();

    let units: Vec<(&Device, &StateKind)> = inventory
        .devices
        .iter()
        .flat_map(|device| kinds.iter().map(move |kind| (device, kind)))
        .collect();

    let workers = config
        .max_concurrency
        .unwrap_or_else(|| inventory.devices.len().clamp(1, 8));
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| NvError::Internal {
            reason: format!("could not build worker pool: {e}"),
        })?;

    tracing::info!(
        stage = mode.stage_label(),
        devices = inventory.devices.len(),
        kinds = kinds.len(),
        workers = workers,
        "starting run"
    );

    let outcomes: Vec<UnitOutcome> = pool.install(|| {
        units
            .par_iter()
            .map(|&(device, kind)| {
                run_unit(
                    device,
                    kind,
                    source,
                    &report_stage,
                    &mode,
                    &exclusions,
                    &rules,
                    config.offline,
                )
            })
            .collect()
    });

    // Aggregated → Done: the report is immutable once returned.
    let mut report = RunReport::new(mode.stage_label());
    for outcome in outcomes {
        report.records.extend(outcome.records);
        if let Some(diff) = outcome.diff {
            report.diffs.push(diff);
        }
    }
    tracing::info!(
        pass = report.pass_count(),
        fail = report.fail_count(),
        skip = report.skip_count(),
        "run finished"
    );
    Ok(report)
}

/// Verdicts and optional diff produced by one (device, kind) unit.
struct UnitOutcome {
    records: Vec<VerdictRecord>,
    diff: Option<DiffRecord>,
}

impl UnitOutcome {
    fn new() -> Self {
        Self {
            records: Vec::new(),
            diff: None,
        }
    }

    fn push(&mut self, device: &str, kind: &str, member: Option<String>, rule: &str, v: Verdict) {
        self.records.push(VerdictRecord {
            device: device.to_string(),
            kind: kind.to_string(),
            member,
            rule: rule.to_string(),
            verdict: v,
        });
    }
}

#[allow(clippy::too_many_arguments)]
fn run_unit(
    device: &Device,
    kind: &StateKind,
    source: &dyn CaptureSource,
    report_stage: &StageDir,
    mode: &RunMode,
    exclusions: &ExclusionList,
    rules: &[NormalizeRule],
    offline: bool,
) -> UnitOutcome {
    let mut out = UnitOutcome::new();
    let name = device.name.as_str();

    if !device.os_supported() {
        out.push(
            name,
            &kind.name,
            None,
            RULE_CAPTURE,
            Verdict::skip(format!("{} is not a supported platform", device.os)),
        );
        return out;
    }
    if !offline && !device.connected {
        out.push(
            name,
            &kind.name,
            None,
            RULE_CAPTURE,
            Verdict::fail(format!("device {name} is not connected")),
        );
        return out;
    }

    let raw = match source.capture(device, kind) {
        Ok(doc) => doc,
        Err(e) => {
            out.push(name, &kind.name, None, RULE_CAPTURE, Verdict::fail(e.to_string()));
            return out;
        }
    };
    let normalized = normalize(&raw, rules);

    let store = SnapshotStore::new(report_stage.clone());
    match store.write(name, &kind.name, &normalized) {
        Ok(WriteOutcome::Created { .. }) => {}
        Ok(WriteOutcome::SkippedExists { divergent, .. }) => {
            tracing::debug!(
                device = name,
                kind = %kind,
                divergent = divergent,
                "snapshot already present; evaluation uses the persisted copy"
            );
        }
        Err(e) => {
            out.push(name, &kind.name, None, RULE_SNAPSHOT, Verdict::fail(e.to_string()));
            return out;
        }
    }

    // Write-then-read within the unit: evaluation always sees the
    // persisted snapshot, including one left by an earlier aborted run.
    let current = match store.read(name, &kind.name) {
        Ok(doc) => doc,
        Err(e) => {
            out.push(name, &kind.name, None, RULE_SNAPSHOT, Verdict::fail(e.to_string()));
            return out;
        }
    };

    let RunMode::CaptureAndCompare { baseline } = mode else {
        // CaptureOnly: the pre stage persists snapshots and stops.
        return out;
    };

    // Must-be-empty kinds are judged on the captured document alone.
    if kind.check == CheckMode::MustBeEmpty {
        out.push(
            name,
            &kind.name,
            None,
            RULE_CONFIG_EMPTY,
            check_must_be_empty(&kind.name, &current),
        );
        return out;
    }

    let baseline_store = SnapshotStore::new(baseline.clone());
    let base = match baseline_store.read(name, &kind.name) {
        Ok(doc) => doc,
        Err(e @ NvError::SnapshotMissing { .. }) => {
            out.push(
                name,
                &kind.name,
                None,
                RULE_BASELINE,
                Verdict::fail(format!("no baseline data: {e}")),
            );
            return out;
        }
        Err(e) => {
            out.push(name, &kind.name, None, RULE_BASELINE, Verdict::fail(e.to_string()));
            return out;
        }
    };

    match kind.check {
        CheckMode::ExactMatch => {
            let diff = diff_documents(&base, &current);
            if diff.is_empty() {
                out.push(name, &kind.name, None, RULE_CONFIG_MATCH, Verdict::Pass);
            } else {
                out.push(
                    name,
                    &kind.name,
                    None,
                    RULE_CONFIG_MATCH,
                    Verdict::fail(format!(
                        "{} difference{} between pre and post {}",
                        diff.len(),
                        if diff.len() == 1 { "" } else { "s" },
                        kind.name
                    )),
                );
                out.diff = Some(DiffRecord {
                    device: name.to_string(),
                    kind: kind.name.clone(),
                    diff,
                });
            }
        }
        CheckMode::InterfacePolicy => match evaluate_interfaces(&current, Some(&base), exclusions) {
            Ok(members) => {
                for m in members {
                    out.push(name, &kind.name, Some(m.member), &m.rule, m.verdict);
                }
            }
            Err(e) => {
                out.push(name, &kind.name, None, RULE_RECORD_SHAPE, Verdict::fail(e.to_string()));
            }
        },
        CheckMode::MustBeEmpty => {}
    }

    out
}

/// Evaluate the pre-only rule semantics over an already-captured stage
/// directory, without any capture or persistence.
///
/// This is the standalone counterpart of a baseline health check: it
/// reads each persisted snapshot and applies the single-record rules.
///
/// # Errors
///
/// - `Precondition` — the stage directory does not exist
pub fn check_stage(inventory: &Inventory, dir: impl AsRef<std::path::Path>) -> Result<RunReport> {
    let stage = StageDir::require(dir)?;
    let store = SnapshotStore::new(stage);
    let exclusions = ExclusionList::default();
    let kinds = StateKind::tracked();

    let mut report = RunReport::new("check");
    for device in &inventory.devices {
        let name = device.name.as_str();
        for kind in &kinds {
            let mut push = |member: Option<String>, rule: &str, v: Verdict| {
                report.records.push(VerdictRecord {
                    device: name.to_string(),
                    kind: kind.name.clone(),
                    member,
                    rule: rule.to_string(),
                    verdict: v,
                });
            };

            if kind.check == CheckMode::ExactMatch {
                push(
                    None,
                    RULE_CONFIG_MATCH,
                    Verdict::skip("nothing to compare during a pre-stage check"),
                );
                continue;
            }

            let doc = match store.read(name, &kind.name) {
                Ok(doc) => doc,
                Err(e @ NvError::SnapshotMissing { .. }) => {
                    push(None, RULE_SNAPSHOT, Verdict::skip(format!("no snapshot captured: {e}")));
                    continue;
                }
                Err(e) => {
                    push(None, RULE_SNAPSHOT, Verdict::fail(e.to_string()));
                    continue;
                }
            };

            match kind.check {
                CheckMode::InterfacePolicy => match evaluate_interfaces(&doc, None, &exclusions) {
                    Ok(members) => {
                        for m in members {
                            push(Some(m.member), &m.rule, m.verdict);
                        }
                    }
                    Err(e) => push(None, RULE_RECORD_SHAPE, Verdict::fail(e.to_string())),
                },
                CheckMode::MustBeEmpty => {
                    push(None, RULE_CONFIG_EMPTY, check_must_be_empty(&kind.name, &doc));
                }
                CheckMode::ExactMatch => {}
            }
        }
    }
    Ok(report)
}
