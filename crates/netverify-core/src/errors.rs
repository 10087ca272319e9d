//! Error taxonomy for netverify.
//!
//! Only `Precondition` aborts a whole run, and it does so before any
//! capture work begins. Every other kind is caught at the (device, kind)
//! or (device, member, rule) granularity and converted into a verdict, so
//! a run always completes and reports maximal information.

use thiserror::Error;

/// Result type alias using NvError
pub type Result<T> = std::result::Result<T, NvError>;

/// Stable classification of every error in the system.
///
/// Each kind maps to a stable error code usable for programmatic error
/// handling, testing, and report output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NvErrorKind {
    /// Missing or invalid stage directory; the only fatal kind
    Precondition,
    /// Per-device capture collaborator failure
    Capture,
    /// Snapshot write/read failure
    SnapshotIo,
    /// Snapshot file absent for a (device, kind) key
    SnapshotMissing,
    /// Persisted snapshot cannot be parsed as structured data
    CorruptSnapshot,
    /// Post-stage comparison with no matching pre-stage record
    NoBaseline,
    /// A normalization rule failed to compile
    InvalidRule,
    /// Malformed caller input (bad record shape, bad argument)
    InvalidInput,
    /// Inventory file could not be read or parsed
    Inventory,
    /// JSON encoding/decoding failure
    Serialization,
    /// Internal invariant breach
    Internal,
}

impl NvErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            NvErrorKind::Precondition => "ERR_PRECONDITION",
            NvErrorKind::Capture => "ERR_CAPTURE",
            NvErrorKind::SnapshotIo => "ERR_SNAPSHOT_IO",
            NvErrorKind::SnapshotMissing => "ERR_SNAPSHOT_MISSING",
            NvErrorKind::CorruptSnapshot => "ERR_CORRUPT_SNAPSHOT",
            NvErrorKind::NoBaseline => "ERR_NO_BASELINE",
            NvErrorKind::InvalidRule => "ERR_INVALID_RULE",
            NvErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            NvErrorKind::Inventory => "ERR_INVENTORY",
            NvErrorKind::Serialization => "ERR_SERIALIZATION",
            NvErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Comprehensive error taxonomy for netverify operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NvError {
    /// Stage directory missing or unusable; aborts the run before capture
    #[error("precondition failed: {reason}")]
    Precondition { reason: String },

    /// Capture collaborator failed for one device
    #[error("capture failed for device {device}: {reason}")]
    Capture { device: String, reason: String },

    /// Snapshot write or read failed at the filesystem level
    #[error("snapshot I/O error at {path}: {reason}")]
    SnapshotIo { path: String, reason: String },

    /// No snapshot file exists for this key
    #[error("snapshot not found at {path}")]
    SnapshotMissing { path: String },

    /// Snapshot file exists but is not valid structured data
    #[error("corrupt snapshot at {path}: {reason}")]
    CorruptSnapshot { path: String, reason: String },

    /// Post-stage evaluation found no matching pre-stage record
    #[error("no baseline data for device {device}, kind {kind}: {detail}")]
    NoBaseline {
        device: String,
        kind: String,
        detail: String,
    },

    /// Normalization rule pattern did not compile
    #[error("invalid normalization rule `{pattern}`: {reason}")]
    InvalidRule { pattern: String, reason: String },

    /// Malformed input (e.g. an interface record that is not a mapping)
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Inventory file could not be loaded
    #[error("inventory error at {path}: {reason}")]
    Inventory { path: String, reason: String },

    /// Serialization error (JSON encoding/decoding)
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// Generic internal error
    #[error("internal error: {reason}")]
    Internal { reason: String },
}

impl NvError {
    /// Get the error kind
    pub fn kind(&self) -> NvErrorKind {
        match self {
            NvError::Precondition { .. } => NvErrorKind::Precondition,
            NvError::Capture { .. } => NvErrorKind::Capture,
            NvError::SnapshotIo { .. } => NvErrorKind::SnapshotIo,
            NvError::SnapshotMissing { .. } => NvErrorKind::SnapshotMissing,
            NvError::CorruptSnapshot { .. } => NvErrorKind::CorruptSnapshot,
            NvError::NoBaseline { .. } => NvErrorKind::NoBaseline,
            NvError::InvalidRule { .. } => NvErrorKind::InvalidRule,
            NvError::InvalidInput { .. } => NvErrorKind::InvalidInput,
            NvError::Inventory { .. } => NvErrorKind::Inventory,
            NvError::Serialization { .. } => NvErrorKind::Serialization,
            NvError::Internal { .. } => NvErrorKind::Internal,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// True only for errors that abort the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind(), NvErrorKind::Precondition)
    }
}

/// Conversion from serde_json::Error to NvError
impl From<serde_json::Error> for NvError {
    fn from(err: serde_json::Error) -> Self {
        NvError::Serialization {
            reason: err.to_string(),
        }
    }
}
