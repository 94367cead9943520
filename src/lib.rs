//! # genpkg
//!
//! A template-based package scaffolding tool that can later reconcile
//! ("upgrade") a generated package against a newer version of its template.
//! Upgrades run a three-way comparison between the fingerprints recorded at
//! generation time, a freshly regenerated reference tree, and the live
//! package contents, applying safe changes automatically and annotating
//! genuine conflicts with merge markers.

pub mod answers;
pub mod apply;
pub mod cli;
pub mod commands;
pub mod config_merge;
pub mod error;
pub mod fingerprint;
pub mod generator;
pub mod output;
pub mod package;
pub mod prompt;
pub mod reconcile;
pub mod snapshot;
pub mod text_merge;

pub use error::{GenpkgError, Result};
pub use package::GeneratedPackage;
pub use snapshot::Snapshot;

/// Current format version for genpkg snapshot files
pub const FORMAT_VERSION: &str = "1.0.0";

/// Name of the snapshot directory stored beside a generated package
pub const SNAPSHOT_DIR: &str = ".genpkg";

/// Name of the scratch directory used during upgrades, inside [`SNAPSHOT_DIR`]
pub const SCRATCH_DIR: &str = "tmp";

/// Default templates root, relative to the working directory
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";
