//! Snapshot normalization.
//!
//! Strips non-semantic keys (device clock lines, volatile banners) from a
//! raw structured snapshot before it is persisted, so pre and post
//! documents compare on equal footing. Rules are data: new patterns are
//! added without touching engine logic.

use crate::errors::{NvError, Result};
use regex::Regex;
use serde_json::Value;

/// A single normalization rule: a regex over mapping key names.
///
/// Any mapping entry whose key matches is removed together with its
/// entire subtree. A rule matching zero paths is a no-op, not an error.
#[derive(Debug, Clone)]
pub struct NormalizeRule {
    pattern: Regex,
}

impl NormalizeRule {
    /// Compile a rule from its pattern text.
    ///
    /// # Errors
    ///
    /// - `InvalidRule` — the pattern is not a valid regex
    pub fn new(pattern: &str) -> Result<Self> {
        let compiled = Regex::new(pattern).map_err(|e| NvError::InvalidRule {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { pattern: compiled })
    }

    pub fn matches(&self, key: &str) -> bool {
        self.pattern.is_match(key)
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

/// Default rules: device clock lines that IOS-family platforms embed as
/// top-level configuration keys and that change on every capture.
pub fn default_rules() -> Vec<NormalizeRule> {
    [
        r"\S{3} \S{3} \d{1,2} \d{1,2}:\d{1,2}:\d{1,2}\.\d{1,3} \S{3}",
        r"!!\d{1,2}:\d{1,2}:\d{1,2} \S{3} \S{3} \S{3} \d{1,2} \d{4,}",
    ]
    .iter()
    .map(|p| NormalizeRule::new(p).expect("built-in rule compiles"))
    .collect()
}

/// Remove every subtree whose key matches any rule.
///
/// Pure: the input document is not mutated, and the same rules applied to
/// the result are a no-op (idempotence). Applied identically regardless
/// of stage so that pre and post snapshots stay comparable.
pub fn normalize(document: &Value, rules: &[NormalizeRule]) -> Value {
    match document {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| !rules.iter().any(|rule| rule.matches(key)))
                .map(|(key, value)| (key.clone(), normalize(value, rules)))
                .collect(),
        ),
        Value::Array(items) => {
            Value::Array(items.iter().map(|item| normalize(item, rules)).collect())
        }
        leaf => leaf.clone(),
    }
}
