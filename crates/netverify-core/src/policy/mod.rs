//! Policy evaluation engine.
//!
//! Applies the tracked rule set to every interface of a captured record,
//! producing one [`Verdict`] per (interface, rule). Inputs are never
//! mutated; the same baseline record may be evaluated against multiple
//! post records.

pub mod interface_view;
pub mod rules;
pub mod verdict;

pub use interface_view::{InterfaceView, ERROR_COUNTERS, RATE_COUNTERS};
pub use rules::{evaluate, RuleContext, RuleKind};
pub use verdict::Verdict;

use crate::errors::{NvError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Interface names excluded from all rules (matched as case-insensitive
/// substrings, e.g. null interfaces).
#[derive(Debug, Clone)]
pub struct ExclusionList {
    needles: Vec<String>,
}

impl ExclusionList {
    pub fn new(needles: Vec<String>) -> Self {
        Self {
            needles: needles.into_iter().map(|n| n.to_lowercase()).collect(),
        }
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        self.needles.iter().any(|needle| lowered.contains(needle))
    }
}

impl Default for ExclusionList {
    fn default() -> Self {
        Self::new(vec!["null".to_string()])
    }
}

/// One rule outcome for one interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberVerdict {
    /// Interface name
    pub member: String,
    /// Rule name (stable, e.g. `counter-nonzero`)
    pub rule: String,
    pub verdict: Verdict,
}

/// Evaluate every tracked rule for every interface in `record`.
///
/// `baseline` carries the paired pre-stage record for post-stage runs;
/// `None` selects the pre-only rule semantics. Interfaces are visited in
/// key order, so the result is deterministic.
///
/// # Errors
///
/// - `InvalidInput` — `record` (or `baseline`) is not a mapping of
///   interface name to record
pub fn evaluate_interfaces(
    record: &Value,
    baseline: Option<&Value>,
    exclusions: &ExclusionList,
) -> Result<Vec<MemberVerdict>> {
    let interfaces = record.as_object().ok_or_else(|| NvError::InvalidInput {
        reason: "interface record is not a mapping of interface name to record".to_string(),
    })?;
    let baseline_map = match baseline {
        Some(doc) => Some(doc.as_object().ok_or_else(|| NvError::InvalidInput {
            reason: "baseline interface record is not a mapping".to_string(),
        })?),
        None => None,
    };

    let mut out = Vec::new();
    for (name, raw) in interfaces {
        if exclusions.is_excluded(name) {
            for rule in RuleKind::ALL {
                out.push(MemberVerdict {
                    member: name.clone(),
                    rule: rule.name().to_string(),
                    verdict: Verdict::skip(format!("interface {name} is excluded from checks")),
                });
            }
            continue;
        }

        // A sub-entity present only in the post stage is itself a
        // reportable condition: fail every rule with a no-baseline reason
        // rather than silently skipping.
        if let Some(base_map) = baseline_map {
            if !base_map.contains_key(name) {
                for rule in RuleKind::ALL {
                    out.push(MemberVerdict {
                        member: name.clone(),
                        rule: rule.name().to_string(),
                        verdict: Verdict::fail(format!("no baseline data for interface {name}")),
                    });
                }
                continue;
            }
        }

        let ctx = RuleContext {
            current: InterfaceView::new(name, raw),
            baseline: baseline_map
                .and_then(|m| m.get(name))
                .map(|b| InterfaceView::new(name, b)),
        };
        for rule in RuleKind::ALL {
            out.push(MemberVerdict {
                member: name.clone(),
                rule: rule.name().to_string(),
                verdict: evaluate(rule, &ctx),
            });
        }
    }
    Ok(out)
}

/// Judge a must-be-empty kind (e.g. failed configurations): any content
/// is a failure at every stage.
pub fn check_must_be_empty(kind: &str, record: &Value) -> Verdict {
    let empty = match record {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(text) => text.is_empty(),
        _ => false,
    };
    if empty {
        Verdict::Pass
    } else {
        Verdict::fail(format!("{kind} is not empty: {record}"))
    }
}
