//! Snapshot persistence: generator config and per-file fingerprint manifest
//!
//! A snapshot is written beside every generated package and fully replaced
//! (never incrementally patched) at the end of a successful upgrade. It is
//! the arbiter of "has the user touched this file" on the next upgrade.

use crate::answers::Answers;
use crate::error::{GenpkgError, Result};
use crate::fingerprint::{fingerprint_tree, Fingerprint};
use crate::FORMAT_VERSION;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File inside the snapshot directory holding the generator identity
pub const CONFIG_FILE: &str = "config.json";

/// File inside the snapshot directory holding the fingerprint manifest
pub const MANIFEST_FILE: &str = "manifest.json";

/// Generator identity and answers recorded at generation/upgrade time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    pub format_version: String,
    pub created: DateTime<Utc>,
    pub generator_name: String,
    pub answers: Answers,
}

/// Per-file fingerprint manifest; covers exactly the files present in the
/// package at snapshot time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub format_version: String,
    pub files: IndexMap<String, Fingerprint>,
}

/// Persisted record of a package's generator, answers and fingerprints
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub config: SnapshotConfig,
    pub manifest: Manifest,
}

impl Snapshot {
    /// Build a fresh snapshot by fingerprinting every file under
    /// `package_root` (the snapshot directory itself excluded)
    pub fn record(package_root: &Path, generator_name: &str, answers: &Answers) -> Result<Self> {
        let files = fingerprint_tree(package_root)?;
        Ok(Self {
            config: SnapshotConfig {
                format_version: FORMAT_VERSION.to_string(),
                created: Utc::now(),
                generator_name: generator_name.to_string(),
                answers: answers.clone(),
            },
            manifest: Manifest {
                format_version: FORMAT_VERSION.to_string(),
                files,
            },
        })
    }

    /// Load a snapshot from its directory
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE);
        let manifest_path = dir.join(MANIFEST_FILE);
        if !config_path.exists() || !manifest_path.exists() {
            return Err(GenpkgError::InvalidSnapshot {
                path: dir.to_path_buf(),
            });
        }
        let config: SnapshotConfig = serde_json::from_str(&fs::read_to_string(&config_path)?)?;
        let manifest: Manifest = serde_json::from_str(&fs::read_to_string(&manifest_path)?)?;
        Ok(Self { config, manifest })
    }

    /// Write the snapshot into `dir`, replacing both state files
    pub fn write(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        fs::write(
            dir.join(CONFIG_FILE),
            serde_json::to_string_pretty(&self.config)?,
        )?;
        fs::write(
            dir.join(MANIFEST_FILE),
            serde_json::to_string_pretty(&self.manifest)?,
        )?;
        Ok(())
    }
}
