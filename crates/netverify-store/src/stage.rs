//! Stage directories.

use netverify_core::errors::{NvError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A validated stage directory: the root for one capture stage's
/// snapshots. A run directory maps 1:1 to a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDir(PathBuf);

impl StageDir {
    /// Require an existing directory.
    ///
    /// This is the baseline precondition of a post run: if the paired
    /// pre-stage directory is absent, the run fails fast before any
    /// capture work begins.
    ///
    /// # Errors
    ///
    /// - `Precondition` — the path does not exist or is not a directory
    pub fn require(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            Ok(Self(path.to_path_buf()))
        } else {
            Err(NvError::Precondition {
                reason: format!("stage directory {} does not exist", path.display()),
            })
        }
    }

    /// Create the directory if needed. A pre-existing directory is fine:
    /// reruns tolerate and reuse earlier stage directories.
    ///
    /// # Errors
    ///
    /// - `Precondition` — the directory could not be created
    pub fn ensure(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        fs::create_dir_all(path).map_err(|e| NvError::Precondition {
            reason: format!("could not create stage directory {}: {}", path.display(), e),
        })?;
        Ok(Self(path.to_path_buf()))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
