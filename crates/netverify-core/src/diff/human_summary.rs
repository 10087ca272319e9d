//! Human-readable summary renderer for document diffs.

use crate::diff::model::{ChangeKind, DiffEntry, DocumentDiff};
use serde_json::Value;

/// Render a human-readable text summary of a [`DocumentDiff`].
///
/// The summary is intended for change-window review output. It is
/// informational only and does not affect the structured diff.
pub fn render_human_summary(diff: &DocumentDiff) -> String {
    if diff.is_empty() {
        return "No differences.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{} difference{} ({} added, {} removed, {} changed)\n",
        diff.len(),
        if diff.len() == 1 { "" } else { "s" },
        diff.count(ChangeKind::Added),
        diff.count(ChangeKind::Removed),
        diff.count(ChangeKind::Changed),
    ));
    for entry in &diff.entries {
        out.push_str(&render_entry(entry));
        out.push('\n');
    }
    out
}

fn render_entry(entry: &DiffEntry) -> String {
    match entry.kind {
        ChangeKind::Added => format!("+ {}: {}", entry.path, render_value(entry.new.as_ref())),
        ChangeKind::Removed => format!("- {}: {}", entry.path, render_value(entry.old.as_ref())),
        ChangeKind::Changed => format!(
            "~ {}: {} -> {}",
            entry.path,
            render_value(entry.old.as_ref()),
            render_value(entry.new.as_ref())
        ),
    }
}

/// Compact single-line rendering, truncated for display.
fn render_value(value: Option<&Value>) -> String {
    let text = match value {
        Some(v) => v.to_string(),
        None => return "∅".to_string(),
    };
    const MAX: usize = 60;
    if text.chars().count() <= MAX {
        text
    } else {
        let cut: String = text.chars().take(MAX).collect();
        format!("{cut}…")
    }
}
