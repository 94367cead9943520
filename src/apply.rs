//! Applying reconciliation outcomes to the live package and committing
//! the new snapshot
//!
//! Plan building resolves every conflicted path to concrete merged
//! content up front; execution is then a plain batch of disjoint file
//! operations. A failure anywhere aborts before the snapshot is replaced,
//! so the old snapshot stays the source of truth and a re-run is safe.

use crate::config_merge;
use crate::error::Result;
use crate::fingerprint::{ConfigFileType, Fingerprint};
use crate::package::GeneratedPackage;
use crate::reconcile::{Action, ConflictKind, Record};
use crate::snapshot::Snapshot;
use crate::text_merge;
use std::fs;
use std::io;
use std::path::Path;

/// One planned mutation of the live package
#[derive(Debug)]
pub enum FileOp {
    /// Copy the regenerated file over the live tree
    CopyNew { path: String },
    /// Delete the live file; already missing counts as success
    Delete { path: String },
    /// Write merged content: conflict markers or a structurally merged
    /// "current" document
    WriteMerged { path: String, content: String },
}

/// Fully resolved set of mutations for one upgrade run
#[derive(Debug, Default)]
pub struct ApplyPlan {
    pub ops: Vec<FileOp>,
    pub added: Vec<String>,
    pub updated: Vec<String>,
    pub removed: Vec<String>,
    /// Config files merged structurally without leaving markers behind
    pub merged: Vec<String>,
    /// Paths left with conflict markers to resolve
    pub conflicts: Vec<String>,
}

/// Build the apply plan from the reconciliation records. Additions,
/// updates and removals map directly; each conflicted path gets merged
/// content (structural merge for parsable config files, text markers
/// otherwise).
pub fn build_plan(package: &GeneratedPackage, records: &[Record]) -> Result<ApplyPlan> {
    let mut plan = ApplyPlan::default();

    for record in records {
        match record.action {
            Action::Added => {
                plan.ops.push(FileOp::CopyNew {
                    path: record.path.clone(),
                });
                plan.added.push(record.path.clone());
            }
            Action::Updated => {
                plan.ops.push(FileOp::CopyNew {
                    path: record.path.clone(),
                });
                plan.updated.push(record.path.clone());
            }
            Action::Removed => {
                plan.ops.push(FileOp::Delete {
                    path: record.path.clone(),
                });
                plan.removed.push(record.path.clone());
            }
            Action::Warning => {
                // Reported earlier; no file mutation
            }
            Action::Conflicted(kind) => {
                let current = read_or_empty(&package.live_path(&record.path))?;
                // Remove conflicts have no regenerated counterpart; the
                // empty new side makes the template's intent visible
                let new = read_or_empty(&package.scratch_path(&record.path))?;
                let (content, still_conflicted) =
                    merge_conflict(record, kind, &current, &new)?;

                plan.ops.push(FileOp::WriteMerged {
                    path: record.path.clone(),
                    content,
                });
                if still_conflicted {
                    plan.conflicts.push(record.path.clone());
                } else {
                    plan.merged.push(record.path.clone());
                }
            }
        }
    }

    Ok(plan)
}

/// Resolve one conflicted path to merged content. Returns the content and
/// whether markers were left behind.
fn merge_conflict(
    record: &Record,
    kind: ConflictKind,
    current: &str,
    new: &str,
) -> Result<(String, bool)> {
    // Structural merge needs all three of before/current/after, so it only
    // applies to update conflicts on recognized config files
    if kind == ConflictKind::Update && ConfigFileType::from_path(Path::new(&record.path)).is_some()
    {
        if let Some(Fingerprint::Config(before)) = &record.old {
            match config_merge::merge_config_file(before, current, new)? {
                Some(outcome) if outcome.has_conflicts => {
                    // Markers isolated to the conflicting keys: the two
                    // documents differ only where nodes conflicted
                    return Ok((text_merge::merge_text(&outcome.current, &outcome.after), true));
                }
                Some(outcome) => return Ok((outcome.current, false)),
                None => {
                    log::warn!(
                        "Failed to parse {} as a config file; falling back to text conflict markers",
                        record.path
                    );
                }
            }
        }
    }

    Ok((text_merge::merge_text(current, new), true))
}

/// Execute every file operation. Fail-fast with no rollback of
/// already-applied files; the snapshot has not been replaced yet, so
/// re-running the upgrade recovers cleanly.
pub fn apply(package: &GeneratedPackage, plan: &ApplyPlan) -> Result<()> {
    for op in &plan.ops {
        match op {
            FileOp::CopyNew { path } => {
                let dest = package.live_path(path);
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(package.scratch_path(path), &dest)?;
                log::debug!("copied {}", path);
            }
            FileOp::Delete { path } => match fs::remove_file(package.live_path(path)) {
                Ok(()) => log::debug!("removed {}", path),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            },
            FileOp::WriteMerged { path, content } => {
                let dest = package.live_path(path);
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&dest, content)?;
                log::debug!("merged {}", path);
            }
        }
    }
    Ok(())
}

/// Replace the package snapshot with the regenerated one. Must only run
/// after every file operation has succeeded.
pub fn commit_snapshot(package: &GeneratedPackage) -> Result<()> {
    let new_snapshot = Snapshot::load(&package.scratch_snapshot_dir())?;
    new_snapshot.write(&package.snapshot_dir)
}

/// Remove the scratch directory; runs on success and on a declined
/// confirmation alike
pub fn cleanup_scratch(package: &GeneratedPackage) -> Result<()> {
    if package.scratch_dir.exists() {
        fs::remove_dir_all(&package.scratch_dir)?;
    }
    Ok(())
}

fn read_or_empty(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}
