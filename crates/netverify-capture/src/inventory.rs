//! Device inventory.

use netverify_core::errors::NvError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Network operating systems the capture collaborator can learn state
/// from. Devices running anything else are skipped, not failed.
pub const SUPPORTED_OS: &[&str] = &["ios", "iosxe", "iosxr", "nxos"];

/// One managed device under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Unique device name; also the snapshot file-name component
    pub name: String,
    /// Network operating system identifier
    pub os: String,
    /// Connection precondition flag maintained by the external session
    /// collaborator (retried with backoff out there, not here)
    #[serde(default)]
    pub connected: bool,
}

impl Device {
    pub fn os_supported(&self) -> bool {
        SUPPORTED_OS.contains(&self.os.as_str())
    }
}

/// The fleet under verification, loaded from a YAML inventory file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub devices: Vec<Device>,
}

/// Inventory loading failures.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("cannot read inventory {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse inventory {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("inventory {path} lists no devices")]
    Empty { path: String },
}

impl From<InventoryError> for NvError {
    fn from(err: InventoryError) -> Self {
        let path = match &err {
            InventoryError::Read { path, .. }
            | InventoryError::Parse { path, .. }
            | InventoryError::Empty { path } => path.clone(),
        };
        NvError::Inventory {
            path,
            reason: err.to_string(),
        }
    }
}

impl Inventory {
    /// Load an inventory from a YAML file.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::Read`] / [`InventoryError::Parse`] — the file
    ///   is unreadable or not valid YAML
    /// - [`InventoryError::Empty`] — the file parsed but lists no devices
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InventoryError> {
        let path = path.as_ref();
        let display_path = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|source| InventoryError::Read {
            path: display_path.clone(),
            source,
        })?;
        let inventory: Inventory =
            serde_yaml::from_str(&raw).map_err(|source| InventoryError::Parse {
                path: display_path.clone(),
                source,
            })?;
        if inventory.devices.is_empty() {
            return Err(InventoryError::Empty { path: display_path });
        }
        tracing::debug!(
            path = %display_path,
            devices = inventory.devices.len(),
            "loaded inventory"
        );
        Ok(inventory)
    }

    /// Build an inventory directly, for callers that already hold the
    /// device list (tests, embedding).
    pub fn from_devices(devices: Vec<Device>) -> Self {
        Self { devices }
    }
}
