//! netverify core — the state-snapshot diff and policy-evaluation engine
//! for pre/post change verification of networked infrastructure.
//!
//! This crate provides:
//! - Normalization of raw structured snapshots (non-semantic key removal)
//! - Recursive structural diffing of two normalized documents
//! - The declarative rule set classifying interface state as
//!   pass/fail/skip
//! - The canonical error taxonomy and logging facility
//!
//! Capture, persistence, and orchestration live in the sibling crates;
//! everything here is pure computation over in-memory documents.

pub mod diff;
pub mod errors;
pub mod kinds;
pub mod logging_facility;
pub mod normalize;
pub mod policy;

// Re-export commonly used types
pub use diff::{diff_documents, render_human_summary, ChangeKind, DiffEntry, DocumentDiff};
pub use errors::{NvError, NvErrorKind, Result};
pub use kinds::{CheckMode, StateKind};
pub use normalize::{default_rules, normalize, NormalizeRule};
pub use policy::{
    check_must_be_empty, evaluate_interfaces, ExclusionList, MemberVerdict, RuleKind, Verdict,
};
