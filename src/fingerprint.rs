//! Content fingerprinting for generated files
//!
//! A fingerprint is either an opaque blake3 digest over a file's exact
//! bytes, or the raw text of a recognized structured-config file. Config
//! files keep their raw text so they can be merged structurally at upgrade
//! time; parsing is deferred until then, so fingerprinting never fails on
//! a malformed config file.

use crate::error::Result;
use crate::SNAPSHOT_DIR;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Recognized structured-config file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFileType {
    Json,
}

impl ConfigFileType {
    /// Detect a structured-config type from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(Self::Json),
            _ => None,
        }
    }
}

/// Identity of one file's content at a point in time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Fingerprint {
    /// The file does not exist (never existed / already removed)
    Missing,
    /// blake3 hex digest over the exact bytes
    Hash(String),
    /// Raw content of a recognized structured-config file
    Config(String),
}

impl Fingerprint {
    pub fn is_missing(&self) -> bool {
        matches!(self, Fingerprint::Missing)
    }
}

impl PartialEq for Fingerprint {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Fingerprint::Missing, Fingerprint::Missing) => true,
            (Fingerprint::Hash(a), Fingerprint::Hash(b)) => a == b,
            (Fingerprint::Config(a), Fingerprint::Config(b)) => {
                // Deep value equality when both sides parse, so formatting
                // and key order don't register as changes. Raw equality
                // otherwise; the parse failure surfaces at merge time.
                match (
                    serde_json::from_str::<serde_json::Value>(a),
                    serde_json::from_str::<serde_json::Value>(b),
                ) {
                    (Ok(va), Ok(vb)) => va == vb,
                    _ => a == b,
                }
            }
            _ => false,
        }
    }
}

impl Eq for Fingerprint {}

/// Compute the blake3 hex digest of a byte slice
pub fn hash_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Fingerprint a single file.
///
/// "Not found" is meaningful business state (absence) and maps to
/// [`Fingerprint::Missing`]; any other I/O failure propagates and aborts
/// the surrounding operation.
pub fn fingerprint_file(path: &Path) -> Result<Fingerprint> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Fingerprint::Missing),
        Err(e) => return Err(e.into()),
    };

    if ConfigFileType::from_path(path).is_some() {
        return Ok(Fingerprint::Config(
            String::from_utf8_lossy(&bytes).into_owned(),
        ));
    }

    Ok(Fingerprint::Hash(hash_bytes(&bytes)))
}

/// Fingerprint every file under `root`, keyed by `/`-separated relative
/// path. The snapshot directory itself is excluded. Files are hashed in
/// parallel; the scan is read-only and order-independent.
pub fn fingerprint_tree(root: &Path) -> Result<IndexMap<String, Fingerprint>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        if rel
            .components()
            .next()
            .map(|c| c.as_os_str() == SNAPSHOT_DIR)
            .unwrap_or(false)
        {
            continue;
        }
        paths.push((relative_key(rel), entry.path().to_path_buf()));
    }

    let fingerprints: Vec<(String, Fingerprint)> = paths
        .into_par_iter()
        .map(|(key, path)| fingerprint_file(&path).map(|fp| (key, fp)))
        .collect::<Result<_>>()?;

    Ok(fingerprints.into_iter().collect())
}

/// Normalize a relative path to a `/`-separated manifest key
pub fn relative_key(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
