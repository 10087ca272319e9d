//! Capture sources.

use crate::inventory::Device;
use netverify_core::errors::{NvError, Result};
use netverify_core::kinds::StateKind;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Produces the structured state document for one (device, kind).
///
/// Implementations wrap vendor sessions or offline exports; the engine
/// pattern-matches on the returned `Result` instead of relying on broad
/// exception suppression. Failure for one device must not prevent
/// capture for others — the engine guarantees that isolation.
pub trait CaptureSource: Send + Sync {
    /// # Errors
    ///
    /// - `Capture` — the document for this (device, kind) could not be
    ///   produced; isolated to this device by the caller
    fn capture(&self, device: &Device, kind: &StateKind) -> Result<Value>;
}

/// Reads previously exported state documents from a directory, one
/// `{device}_{kind}.json` file per key.
///
/// This is the offline capture collaborator: it backs `--offline` runs
/// and doubles as the test double for the engine.
#[derive(Debug, Clone)]
pub struct FsCaptureSource {
    root: PathBuf,
}

impl FsCaptureSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl CaptureSource for FsCaptureSource {
    fn capture(&self, device: &Device, kind: &StateKind) -> Result<Value> {
        let path = self.root.join(format!("{}_{}.json", device.name, kind.name));
        let raw = fs::read_to_string(&path).map_err(|e| NvError::Capture {
            device: device.name.clone(),
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;
        serde_json::from_str(&raw).map_err(|e| NvError::Capture {
            device: device.name.clone(),
            reason: format!("{} is not valid JSON: {}", path.display(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netverify_core::kinds::{CheckMode, StateKind};
    use serde_json::json;

    fn device(name: &str) -> Device {
        Device {
            name: name.into(),
            os: "iosxe".into(),
            connected: true,
        }
    }

    #[test]
    fn test_reads_exported_document() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join("r1_interface.json"),
            r#"{"Gi0/0": {"oper_status": "up"}}"#,
        )
        .unwrap();

        let source = FsCaptureSource::new(tmp.path());
        let kind = StateKind::new("interface", CheckMode::InterfacePolicy);
        let doc = source.capture(&device("r1"), &kind).unwrap();
        assert_eq!(doc, json!({"Gi0/0": {"oper_status": "up"}}));
    }

    #[test]
    fn test_missing_export_is_capture_error() {
        let tmp = tempfile::tempdir().unwrap();
        let source = FsCaptureSource::new(tmp.path());
        let kind = StateKind::new("interface", CheckMode::InterfacePolicy);
        let err = source.capture(&device("r9"), &kind).unwrap_err();
        assert_eq!(err.code(), "ERR_CAPTURE");
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_invalid_export_is_capture_error() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("r1_interface.json"), "not json").unwrap();

        let source = FsCaptureSource::new(tmp.path());
        let kind = StateKind::new("interface", CheckMode::InterfacePolicy);
        let err = source.capture(&device("r1"), &kind).unwrap_err();
        assert_eq!(err.code(), "ERR_CAPTURE");
    }
}
