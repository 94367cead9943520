//! Generator collaborator and the regeneration driver
//!
//! The upgrade engine only ever asks a generator to produce a fresh tree
//! for a fixed answer set. Template discovery and rendering live behind
//! the [`Generator`] seam; the shipped [`DirGenerator`] copies a template
//! directory tree, with per-feature overlays selected by answer flags.

use crate::answers::Answers;
use crate::error::{GenpkgError, Result};
use crate::snapshot::Snapshot;
use crate::SNAPSHOT_DIR;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Subdirectory of a template copied for every generation
const BASE_DIR: &str = "base";

/// Subdirectory of a template holding per-feature overlays
const FEATURES_DIR: &str = "features";

/// Summary of the files a generator run produced
#[derive(Debug, Default)]
pub struct GeneratorReport {
    /// Relative paths written under the destination
    pub written: Vec<PathBuf>,
}

/// Collaborator that produces a package tree from a set of answers
pub trait Generator {
    /// Generator name as referenced by snapshots
    fn name(&self) -> &str;

    /// Feature flags this generator recognizes
    fn known_features(&self) -> Vec<String>;

    /// Produce the package under `dest`
    fn run(&self, answers: &Answers, dest: &Path) -> Result<GeneratorReport>;
}

/// Generator backed by a template directory: `base/` is copied always,
/// `features/<flag>/` overlays are copied when the flag is enabled
#[derive(Debug, Clone)]
pub struct DirGenerator {
    name: String,
    template_dir: PathBuf,
}

impl DirGenerator {
    pub fn new(name: impl Into<String>, template_dir: PathBuf) -> Self {
        Self {
            name: name.into(),
            template_dir,
        }
    }

    fn copy_tree(src: &Path, dest: &Path, report: &mut GeneratorReport) -> Result<()> {
        for entry in WalkDir::new(src).sort_by_file_name() {
            let entry = entry?;
            let Ok(rel) = entry.path().strip_prefix(src) else {
                continue;
            };
            let target = dest.join(rel);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(entry.path(), &target)?;
                report.written.push(rel.to_path_buf());
            }
        }
        Ok(())
    }
}

impl Generator for DirGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    fn known_features(&self) -> Vec<String> {
        let features_dir = self.template_dir.join(FEATURES_DIR);
        let mut flags = Vec::new();
        if let Ok(entries) = fs::read_dir(&features_dir) {
            for entry in entries.flatten() {
                if entry.path().is_dir() {
                    if let Some(name) = entry.file_name().to_str() {
                        flags.push(name.to_string());
                    }
                }
            }
        }
        flags.sort();
        flags
    }

    fn run(&self, answers: &Answers, dest: &Path) -> Result<GeneratorReport> {
        let mut report = GeneratorReport::default();
        fs::create_dir_all(dest)?;

        let base = self.template_dir.join(BASE_DIR);
        if base.is_dir() {
            Self::copy_tree(&base, dest, &mut report)?;
        }

        for flag in answers.features() {
            let feature_dir = self.template_dir.join(FEATURES_DIR).join(flag);
            if feature_dir.is_dir() {
                Self::copy_tree(&feature_dir, dest, &mut report)?;
            } else {
                log::warn!("Generator '{}' has no feature '{}'", self.name, flag);
            }
        }

        Ok(report)
    }
}

/// Discovers generators from the subdirectories of a templates root
pub struct GeneratorRegistry {
    generators: Vec<DirGenerator>,
}

impl GeneratorRegistry {
    /// Scan `templates_root`; each subdirectory is one generator
    pub fn discover(templates_root: &Path) -> Result<Self> {
        let mut generators = Vec::new();
        if templates_root.is_dir() {
            for entry in fs::read_dir(templates_root)? {
                let entry = entry?;
                if !entry.path().is_dir() {
                    continue;
                }
                if let Some(name) = entry.file_name().to_str() {
                    generators.push(DirGenerator::new(name, entry.path()));
                }
            }
        }
        generators.sort_by(|a, b| a.name.cmp(&b.name));
        log::debug!(
            "Discovered {} generators under {}",
            generators.len(),
            templates_root.display()
        );
        Ok(Self { generators })
    }

    pub fn names(&self) -> Vec<&str> {
        self.generators.iter().map(|g| g.name()).collect()
    }

    /// Look up a generator; the error lists the available options
    pub fn get(&self, name: &str) -> Result<&DirGenerator> {
        self.generators
            .iter()
            .find(|g| g.name() == name)
            .ok_or_else(|| {
                GenpkgError::generator(format!(
                    "Unknown generator '{}'. Your options are: {}",
                    name,
                    self.names().join(", ")
                ))
            })
    }
}

/// Run a generator into `dest` and record a fresh snapshot beside the
/// produced tree. Unrecognized feature flags are reported but not fatal.
pub fn produce(generator: &dyn Generator, answers: &Answers, dest: &Path) -> Result<GeneratorReport> {
    for flag in answers.unknown_features(&generator.known_features()) {
        log::warn!(
            "Generator '{}' does not recognize feature '{}'",
            generator.name(),
            flag
        );
    }

    let report = generator.run(answers, dest)?;
    let snapshot = Snapshot::record(dest, generator.name(), answers)?;
    snapshot.write(&dest.join(SNAPSHOT_DIR))?;
    Ok(report)
}

/// Clear `scratch` and produce a fresh reference tree with its own
/// snapshot. Repeated calls with identical answers overwrite the scratch
/// tree deterministically; clearing first keeps stale leftovers out of
/// the comparison.
pub fn regenerate(generator: &dyn Generator, answers: &Answers, scratch: &Path) -> Result<()> {
    if scratch.exists() {
        fs::remove_dir_all(scratch)?;
    }
    fs::create_dir_all(scratch)?;
    produce(generator, answers, scratch)?;
    Ok(())
}
