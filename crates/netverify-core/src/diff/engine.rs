//! Structural diff computation.
//!
//! Recursive comparison over generic JSON-shaped documents: mappings are
//! compared key-by-key, sequences element-wise (order-sensitive), leaves
//! by equality. The inputs are never mutated, so the same pre document
//! can be compared against multiple post documents.

use crate::diff::model::{ChangeKind, DiffEntry, DocumentDiff};
use serde_json::Value;
use std::collections::BTreeSet;

/// Compute the structural delta between two normalized documents.
///
/// Keys present only in `pre` report as `removed`, keys present only in
/// `post` as `added`, keys in both with unequal values as `changed`.
/// Equal values at every depth produce no entry, so
/// `diff_documents(d, d)` is always empty. Entries are sorted by path.
pub fn diff_documents(pre: &Value, post: &Value) -> DocumentDiff {
    // Fast path: equal documents produce an empty diff.
    if pre == post {
        return DocumentDiff::default();
    }

    let mut entries = Vec::new();
    walk(&mut Vec::new(), pre, post, &mut entries);
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    DocumentDiff { entries }
}

fn walk(path: &mut Vec<String>, pre: &Value, post: &Value, out: &mut Vec<DiffEntry>) {
    if pre == post {
        return;
    }
    match (pre, post) {
        (Value::Object(a), Value::Object(b)) => {
            let keys: BTreeSet<&String> = a.keys().chain(b.keys()).collect();
            for key in keys {
                path.push(key.clone());
                match (a.get(key), b.get(key)) {
                    (Some(x), Some(y)) => walk(path, x, y, out),
                    (Some(x), None) => out.push(entry(path, ChangeKind::Removed, Some(x), None)),
                    (None, Some(y)) => out.push(entry(path, ChangeKind::Added, None, Some(y))),
                    (None, None) => {}
                }
                path.pop();
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            let shared = a.len().min(b.len());
            for i in 0..shared {
                path.push(format!("[{i}]"));
                walk(path, &a[i], &b[i], out);
                path.pop();
            }
            for (i, item) in a.iter().enumerate().skip(shared) {
                path.push(format!("[{i}]"));
                out.push(entry(path, ChangeKind::Removed, Some(item), None));
                path.pop();
            }
            for (i, item) in b.iter().enumerate().skip(shared) {
                path.push(format!("[{i}]"));
                out.push(entry(path, ChangeKind::Added, None, Some(item)));
                path.pop();
            }
        }
        _ => out.push(entry(path, ChangeKind::Changed, Some(pre), Some(post))),
    }
}

fn entry(path: &[String], kind: ChangeKind, old: Option<&Value>, new: Option<&Value>) -> DiffEntry {
    DiffEntry {
        path: join_path(path),
        kind,
        old: old.cloned(),
        new: new.cloned(),
    }
}

/// Render path segments as `a.b[0].c`; the document root is `(root)`.
fn join_path(segments: &[String]) -> String {
    if segments.is_empty() {
        return "(root)".to_string();
    }
    let mut out = String::new();
    for segment in segments {
        if !out.is_empty() && !segment.starts_with('[') {
            out.push('.');
        }
        out.push_str(segment);
    }
    out
}
