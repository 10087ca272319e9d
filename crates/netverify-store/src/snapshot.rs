//! Write-once snapshot persistence.
//!
//! One file per (device, state-kind) under a stage directory, named
//! `{device}_{kind}.json`. Files are single-writer: exactly one task ever
//! writes a given key, so no file-level locking is needed.

use crate::stage::StageDir;
use netverify_core::errors::{NvError, Result};
use serde_json::Value;
use sha2::{Digest as _, Sha256};
use std::fs::{self, OpenOptions};
use std::io::{self, Write as _};
use std::path::PathBuf;

/// Outcome of a snapshot write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// A new snapshot file was created
    Created {
        /// SHA256 of the persisted bytes (hex-encoded)
        digest: String,
    },
    /// A snapshot already existed for this key; nothing was written
    SkippedExists {
        /// Digest of the bytes already on disk
        digest: String,
        /// True when the attempted content differs from what is on disk
        divergent: bool,
    },
}

/// Persists and loads snapshots for one stage directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    stage: StageDir,
}

impl SnapshotStore {
    pub fn new(stage: StageDir) -> Self {
        Self { stage }
    }

    /// Deterministic snapshot file path for a (device, kind) key.
    pub fn path_for(&self, device: &str, kind: &str) -> PathBuf {
        self.stage.path().join(format!("{device}_{kind}.json"))
    }

    /// Persist a normalized document, write-once.
    ///
    /// If a file for this key already exists the write is skipped and
    /// reported; the persisted content is never altered after the first
    /// write. Creation uses `create_new`, so a concurrent duplicate
    /// attempt resolves to a skip rather than a clobber.
    ///
    /// # Errors
    ///
    /// - `SnapshotIo` — the stage directory is missing/unwritable, or the
    ///   write itself failed
    /// - `Serialization` — the document could not be encoded
    pub fn write(&self, device: &str, kind: &str, document: &Value) -> Result<WriteOutcome> {
        let path = self.path_for(device, kind);
        let json = serde_json::to_string_pretty(document).map_err(|e| NvError::Serialization {
            reason: format!("failed to serialize snapshot for {device}/{kind}: {e}"),
        })?;
        let digest = sha256_hex(json.as_bytes());

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(json.as_bytes())
                    .map_err(|e| NvError::SnapshotIo {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    })?;
                tracing::debug!(
                    device = device,
                    kind = kind,
                    digest = %digest,
                    size_bytes = json.len(),
                    "persisted snapshot"
                );
                Ok(WriteOutcome::Created { digest })
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                let existing = fs::read(&path).map_err(|e| NvError::SnapshotIo {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
                let existing_digest = sha256_hex(&existing);
                let divergent = existing_digest != digest;
                if divergent {
                    tracing::warn!(
                        device = device,
                        kind = kind,
                        "snapshot already exists with different content; keeping the original"
                    );
                } else {
                    tracing::debug!(device = device, kind = kind, "snapshot already exists");
                }
                Ok(WriteOutcome::SkippedExists {
                    digest: existing_digest,
                    divergent,
                })
            }
            Err(e) => Err(NvError::SnapshotIo {
                path: path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Load the snapshot for a (device, kind) key.
    ///
    /// # Errors
    ///
    /// - `SnapshotMissing` — no file exists for this key
    /// - `CorruptSnapshot` — the file cannot be parsed as structured data
    /// - `SnapshotIo` — the file exists but could not be read
    pub fn read(&self, device: &str, kind: &str) -> Result<Value> {
        let path = self.path_for(device, kind);
        let raw = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(NvError::SnapshotMissing {
                    path: path.display().to_string(),
                });
            }
            Err(e) => {
                return Err(NvError::SnapshotIo {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };
        serde_json::from_str(&raw).map_err(|e| NvError::CorruptSnapshot {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
