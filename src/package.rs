//! Handle to a previously generated package and its snapshot directory

use crate::error::{GenpkgError, Result};
use crate::{SCRATCH_DIR, SNAPSHOT_DIR};
use std::path::{Path, PathBuf};

/// A package on disk that was produced by a generator
#[derive(Debug, Clone)]
pub struct GeneratedPackage {
    /// Package root directory
    pub root: PathBuf,
    /// `.genpkg/` directory path
    pub snapshot_dir: PathBuf,
    /// Scratch directory used for regeneration during upgrades
    pub scratch_dir: PathBuf,
}

impl GeneratedPackage {
    /// Open an existing generated package, validating that it exists and
    /// carries a snapshot directory
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GenpkgError::invalid_input(format!(
                "There is no valid package at {}",
                path.display()
            )));
        }
        if !path.join(SNAPSHOT_DIR).exists() {
            return Err(GenpkgError::invalid_input(format!(
                "The package at {} was not created with this tool, so it cannot be upgraded",
                path.display()
            )));
        }
        Ok(Self::from_root(path.to_path_buf()))
    }

    /// Build the handle without validation (used right after generation)
    pub fn from_root(root: PathBuf) -> Self {
        let snapshot_dir = root.join(SNAPSHOT_DIR);
        let scratch_dir = snapshot_dir.join(SCRATCH_DIR);
        Self {
            root,
            snapshot_dir,
            scratch_dir,
        }
    }

    /// Absolute path of a live file from its manifest key
    pub fn live_path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Absolute path of the regenerated counterpart of a manifest key
    pub fn scratch_path(&self, rel: &str) -> PathBuf {
        self.scratch_dir.join(rel)
    }

    /// Snapshot directory of the regenerated scratch tree
    pub fn scratch_snapshot_dir(&self) -> PathBuf {
        self.scratch_dir.join(SNAPSHOT_DIR)
    }
}
