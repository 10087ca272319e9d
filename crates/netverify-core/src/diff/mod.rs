//! Structural snapshot diffing.
//!
//! The core entry point is [`diff_documents`], which compares two
//! normalized documents and produces a [`DocumentDiff`].

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::diff_documents;
pub use human_summary::render_human_summary;
pub use model::{ChangeKind, DiffEntry, DocumentDiff};
