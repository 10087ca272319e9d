//! Typed read-only view over a raw interface record.
//!
//! Interface records arrive as generic JSON-shaped documents in the
//! capture collaborator's documented shape. The view exposes the handful
//! of fields the policy rules consume without copying the record.

use serde_json::Value;

/// Counter keys checked by the counter-nonzero rule.
pub const ERROR_COUNTERS: &[&str] = &[
    "in_crc_errors",
    "in_errors",
    "out_errors",
    "in_discards",
    "out_discard",
    "in_unknown_protos",
];

/// Rate counter keys checked by the rate-not-stalled rule.
pub const RATE_COUNTERS: &[&str] = &["in_rate_pkts", "out_rate_pkts"];

/// Borrowed view over one interface's record.
#[derive(Debug, Clone, Copy)]
pub struct InterfaceView<'a> {
    name: &'a str,
    raw: &'a Value,
}

impl<'a> InterfaceView<'a> {
    pub fn new(name: &'a str, raw: &'a Value) -> Self {
        Self { name, raw }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn oper_status(&self) -> Option<&str> {
        self.raw.get("oper_status")?.as_str()
    }

    pub fn enabled(&self) -> Option<bool> {
        self.raw.get("enabled")?.as_bool()
    }

    pub fn duplex_mode(&self) -> Option<&str> {
        self.raw.get("duplex_mode")?.as_str()
    }

    /// Loopbacks lack counters on some platforms.
    pub fn has_counters(&self) -> bool {
        self.raw.get("counters").is_some()
    }

    pub fn has_rates(&self) -> bool {
        self.raw
            .get("counters")
            .and_then(|c| c.get("rate"))
            .is_some()
    }

    /// Error/discard counter by name, `None` when the platform does not
    /// report it.
    pub fn counter(&self, key: &str) -> Option<i64> {
        as_count(self.raw.get("counters")?.get(key)?)
    }

    /// Traffic rate counter by name, from the nested `counters.rate` map.
    pub fn rate_counter(&self, key: &str) -> Option<i64> {
        as_count(self.raw.get("counters")?.get("rate")?.get(key)?)
    }
}

/// Counters are integral; tolerate platforms that emit them as floats.
fn as_count(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f.round() as i64))
}
