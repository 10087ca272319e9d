//! Policy rules over interface records.
//!
//! Each rule is a pure function from an evaluation context to a
//! [`Verdict`]. Pre-only runs evaluate the captured record on its own;
//! post runs additionally carry the paired baseline record. A field the
//! platform does not report is never counted as a failure.

use crate::policy::interface_view::{InterfaceView, ERROR_COUNTERS, RATE_COUNTERS};
use crate::policy::verdict::Verdict;
use std::fmt;

/// The tracked rule set.
///
/// `counter-nondecreasing` is deliberately absent: it is disabled in this
/// design and has no dormant code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    CounterNonzero,
    StatusNotDown,
    DuplexNotHalf,
    RateNotStalled,
}

impl RuleKind {
    pub const ALL: [RuleKind; 4] = [
        RuleKind::CounterNonzero,
        RuleKind::StatusNotDown,
        RuleKind::DuplexNotHalf,
        RuleKind::RateNotStalled,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RuleKind::CounterNonzero => "counter-nonzero",
            RuleKind::StatusNotDown => "status-not-down",
            RuleKind::DuplexNotHalf => "duplex-not-half",
            RuleKind::RateNotStalled => "rate-not-stalled",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Evaluation context for one interface: the record captured at the
/// current stage, plus the paired baseline record when comparing.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub current: InterfaceView<'a>,
    pub baseline: Option<InterfaceView<'a>>,
}

/// Apply one rule to one interface.
pub fn evaluate(rule: RuleKind, ctx: &RuleContext<'_>) -> Verdict {
    match rule {
        RuleKind::CounterNonzero => counter_nonzero(ctx),
        RuleKind::StatusNotDown => status_not_down(ctx),
        RuleKind::DuplexNotHalf => duplex_not_half(ctx),
        RuleKind::RateNotStalled => rate_not_stalled(ctx),
    }
}

fn counter_nonzero(ctx: &RuleContext<'_>) -> Verdict {
    let cur = &ctx.current;
    if !cur.has_counters() {
        return Verdict::skip(format!("interface {} has no counters", cur.name()));
    }

    match &ctx.baseline {
        None => {
            let mut hot: Vec<(&str, i64)> = Vec::new();
            for key in ERROR_COUNTERS {
                match cur.counter(key) {
                    Some(value) if value > 0 => hot.push((key, value)),
                    Some(_) => {}
                    None => log_unsupported(cur.name(), key),
                }
            }
            if hot.is_empty() {
                Verdict::Pass
            } else {
                let names: Vec<&str> = hot.iter().map(|(k, _)| *k).collect();
                let values: Vec<String> = hot.iter().map(|(_, v)| v.to_string()).collect();
                Verdict::fail(format!(
                    "interface {} has a count of ({}) for ({}) error counter{}",
                    cur.name(),
                    values.join(", "),
                    names.join(", "),
                    if hot.len() > 1 { "s" } else { "" }
                ))
            }
        }
        Some(base) => {
            let mut regressed: Vec<String> = Vec::new();
            for key in ERROR_COUNTERS {
                let Some(value) = cur.counter(key) else {
                    log_unsupported(cur.name(), key);
                    continue;
                };
                if value <= 0 {
                    continue;
                }
                match base.counter(key) {
                    None => {
                        return Verdict::fail(format!(
                            "no baseline data for counter {} on interface {}",
                            key,
                            cur.name()
                        ));
                    }
                    Some(prev) if prev != value => regressed.push(format!(
                        "counter {} moved from {} to {} (delta {})",
                        key,
                        prev,
                        value,
                        value - prev
                    )),
                    Some(_) => {}
                }
            }
            if regressed.is_empty() {
                Verdict::Pass
            } else {
                Verdict::fail(format!(
                    "interface {}: {}",
                    cur.name(),
                    regressed.join("; ")
                ))
            }
        }
    }
}

fn status_not_down(ctx: &RuleContext<'_>) -> Verdict {
    let cur = &ctx.current;
    let Some(status) = cur.oper_status() else {
        log_unsupported(cur.name(), "oper_status");
        return Verdict::skip(format!(
            "oper_status not reported for interface {}",
            cur.name()
        ));
    };
    if status != "down" {
        return Verdict::Pass;
    }

    match &ctx.baseline {
        Some(base) => match base.oper_status() {
            None => Verdict::fail(format!(
                "no baseline data for oper_status on interface {}",
                cur.name()
            )),
            Some(prev) if prev != status => Verdict::fail(format!(
                "interface {} oper_status changed between stages: pre {}, post {}",
                cur.name(),
                prev,
                status
            )),
            Some(_) => Verdict::Pass,
        },
        None => match cur.enabled() {
            Some(true) => Verdict::fail(format!("interface {} is down", cur.name())),
            Some(false) => Verdict::skip(format!("interface {} is admin-down", cur.name())),
            None => {
                log_unsupported(cur.name(), "enabled");
                Verdict::skip(format!(
                    "enabled flag not reported for interface {}",
                    cur.name()
                ))
            }
        },
    }
}

fn duplex_not_half(ctx: &RuleContext<'_>) -> Verdict {
    let cur = &ctx.current;
    let Some(duplex) = cur.duplex_mode() else {
        log_unsupported(cur.name(), "duplex_mode");
        return Verdict::skip(format!(
            "duplex_mode not reported for interface {}",
            cur.name()
        ));
    };
    if duplex != "half" {
        return Verdict::Pass;
    }

    match &ctx.baseline {
        Some(base) => match base.duplex_mode() {
            None => Verdict::fail(format!(
                "no baseline data for duplex_mode on interface {}",
                cur.name()
            )),
            Some(prev) if prev != duplex => Verdict::fail(format!(
                "interface {} duplex_mode changed between stages: pre {}, post {}",
                cur.name(),
                prev,
                duplex
            )),
            Some(_) => Verdict::Pass,
        },
        None => match cur.enabled() {
            Some(true) => Verdict::fail(format!("interface {} is in half-duplex", cur.name())),
            Some(false) => Verdict::skip(format!("interface {} is admin-down", cur.name())),
            None => {
                log_unsupported(cur.name(), "enabled");
                Verdict::skip(format!(
                    "enabled flag not reported for interface {}",
                    cur.name()
                ))
            }
        },
    }
}

fn rate_not_stalled(ctx: &RuleContext<'_>) -> Verdict {
    let cur = &ctx.current;
    if !cur.has_counters() {
        return Verdict::skip(format!("interface {} has no counters", cur.name()));
    }
    if !cur.has_rates() {
        return Verdict::skip(format!("interface {} has no rate counters", cur.name()));
    }

    match &ctx.baseline {
        None => {
            let mut stalled: Vec<&str> = Vec::new();
            for key in RATE_COUNTERS {
                match cur.rate_counter(key) {
                    Some(0) => stalled.push(key),
                    Some(_) => {}
                    None => log_unsupported(cur.name(), key),
                }
            }
            if stalled.is_empty() {
                Verdict::Pass
            } else {
                Verdict::fail(format!(
                    "interface {} has zero-rate counter{}: {}",
                    cur.name(),
                    if stalled.len() > 1 { "s" } else { "" },
                    stalled.join(", ")
                ))
            }
        }
        Some(base) => {
            let mut transitions: Vec<String> = Vec::new();
            for key in RATE_COUNTERS {
                let Some(value) = cur.rate_counter(key) else {
                    log_unsupported(cur.name(), key);
                    continue;
                };
                match base.rate_counter(key) {
                    None => {
                        return Verdict::fail(format!(
                            "no baseline data for rate counter {} on interface {}",
                            key,
                            cur.name()
                        ));
                    }
                    Some(prev) if (prev != 0 && value == 0) || (prev == 0 && value != 0) => {
                        transitions.push(format!(
                            "rate counter {} moved from {} to {}",
                            key, prev, value
                        ));
                    }
                    Some(_) => {}
                }
            }
            if transitions.is_empty() {
                Verdict::Pass
            } else {
                Verdict::fail(format!(
                    "interface {}: {}",
                    cur.name(),
                    transitions.join("; ")
                ))
            }
        }
    }
}

fn log_unsupported(interface: &str, field: &str) {
    tracing::debug!(
        interface = interface,
        field = field,
        "field unsupported for this platform; not evaluated"
    );
}
