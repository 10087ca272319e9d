//! Tracked state kinds.
//!
//! The set of state categories captured per device is data, not code:
//! adding a kind means adding an entry to [`StateKind::tracked`], not
//! touching the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a captured record for this kind is judged at the post stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckMode {
    /// Per-interface policy rules against the paired baseline record
    InterfacePolicy,
    /// Structural diff against the baseline; any entry is a failure
    ExactMatch,
    /// The captured document itself must be empty at every stage
    MustBeEmpty,
}

/// One category of captured structured state (e.g. configuration,
/// interface).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateKind {
    /// Stable name; also the snapshot file-name component
    pub name: String,
    /// How post-stage records of this kind are judged
    pub check: CheckMode,
}

impl StateKind {
    pub fn new(name: impl Into<String>, check: CheckMode) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }

    /// The default tracked set: interface state plus the three
    /// configuration views captured per device.
    pub fn tracked() -> Vec<StateKind> {
        vec![
            StateKind::new("interface", CheckMode::InterfacePolicy),
            StateKind::new("config_running", CheckMode::ExactMatch),
            StateKind::new("config_failed", CheckMode::MustBeEmpty),
            StateKind::new("config_failed_startup", CheckMode::MustBeEmpty),
        ]
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
