//! Snapshot store — persists one JSON document per (device, state-kind)
//! under a stage directory.
//!
//! Snapshots are write-once: a second write attempt for the same key is
//! a reported skip, never an overwrite. The skip-if-exists rule is the
//! sole mutual-exclusion mechanism and is idempotent under reruns.

pub mod snapshot;
pub mod stage;

pub use snapshot::{SnapshotStore, WriteOutcome};
pub use stage::StageDir;
