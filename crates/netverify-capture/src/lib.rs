//! Capture collaborator contracts.
//!
//! The engine consumes, and must not re-implement, device capture: given
//! an entity and a state-kind, a collaborator returns a structured
//! document in the documented shape. Connection lifecycle stays external
//! too — the engine only sees a per-device `connected` precondition flag.

pub mod inventory;
pub mod source;

pub use inventory::{Device, Inventory, InventoryError, SUPPORTED_OS};
pub use source::{CaptureSource, FsCaptureSource};
