//! Structural diff output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Entries are path-sorted for deterministic serialization.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The kind of change at one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Path present only in the post document
    Added,
    /// Path present only in the pre document
    Removed,
    /// Path present in both with unequal values
    Changed,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Added => write!(f, "added"),
            ChangeKind::Removed => write!(f, "removed"),
            ChangeKind::Changed => write!(f, "changed"),
        }
    }
}

/// One structural difference between two documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffEntry {
    /// Dotted key path; sequence positions appear as `[i]`
    pub path: String,
    pub kind: ChangeKind,
    /// Value on the pre side (absent for additions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old: Option<Value>,
    /// Value on the post side (absent for removals)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new: Option<Value>,
}

/// The full delta between two normalized documents of the same
/// (entity, state-kind).
///
/// An empty diff is the pass condition for full-document equality checks
/// such as configuration-drift detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentDiff {
    /// Entries sorted by path so textual reports are reproducible
    pub entries: Vec<DiffEntry>,
}

impl DocumentDiff {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Count the entries of one change kind.
    pub fn count(&self, kind: ChangeKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }
}
