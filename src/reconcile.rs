//! Three-way reconciliation between the stored snapshot, the regenerated
//! tree and the live package
//!
//! Classification is a pure function of the two fingerprint manifests and
//! a live-file lookup; reporting and mutation happen in separate stages.

use crate::error::Result;
use crate::fingerprint::Fingerprint;
use indexmap::IndexMap;

/// How a conflicted path was going to change before the conflict was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    Add,
    Update,
    Remove,
}

/// Per-path classification outcome of the three-way compare.
///
/// Paths where the template is unchanged (old == new) produce no record at
/// all, so "unchanged" is represented by absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Added,
    Removed,
    Updated,
    Warning,
    Conflicted(ConflictKind),
}

/// One reconciliation record
#[derive(Debug, Clone)]
pub struct Record {
    pub path: String,
    pub action: Action,
    pub old: Option<Fingerprint>,
    pub new: Option<Fingerprint>,
    pub live: Option<Fingerprint>,
}

/// Classify every path in old ∪ new.
///
/// The old fingerprint is the arbiter of "has the user touched this":
/// equality to old, not to new, licenses an automatic change. Live files
/// that appear in neither manifest belong to the user and are never
/// mentioned.
pub fn reconcile<F>(
    old: &IndexMap<String, Fingerprint>,
    new: &IndexMap<String, Fingerprint>,
    mut live: F,
) -> Result<Vec<Record>>
where
    F: FnMut(&str) -> Result<Fingerprint>,
{
    let mut records = Vec::new();

    // Pass 1: paths the old snapshot knows about
    for (path, old_fp) in old {
        match new.get(path) {
            None => {
                // Template removed this file
                let live_fp = live(path)?;
                if live_fp == *old_fp {
                    records.push(Record {
                        path: path.clone(),
                        action: Action::Removed,
                        old: Some(old_fp.clone()),
                        new: None,
                        live: Some(live_fp),
                    });
                } else if !live_fp.is_missing() {
                    // User edited a file the template wants gone
                    records.push(Record {
                        path: path.clone(),
                        action: Action::Conflicted(ConflictKind::Remove),
                        old: Some(old_fp.clone()),
                        new: None,
                        live: Some(live_fp),
                    });
                }
                // Already absent live: nothing to reconcile
            }
            Some(new_fp) if new_fp != old_fp => {
                // Template changed this file
                let live_fp = live(path)?;
                let action = if live_fp == *old_fp {
                    // Unchanged since generation / last upgrade
                    Action::Updated
                } else if live_fp == *new_fp {
                    // Changed, but to exactly the incoming value
                    Action::Warning
                } else {
                    Action::Conflicted(ConflictKind::Update)
                };
                records.push(Record {
                    path: path.clone(),
                    action,
                    old: Some(old_fp.clone()),
                    new: Some(new_fp.clone()),
                    live: Some(live_fp),
                });
            }
            Some(_) => {
                // Template unchanged here; local edits are the user's own
                // business and never reported
            }
        }
    }

    // Pass 2: paths the template added
    for (path, new_fp) in new {
        if old.contains_key(path) {
            continue;
        }
        let live_fp = live(path)?;
        let action = if live_fp.is_missing() {
            Action::Added
        } else {
            // A file already exists where the template wants to create one
            Action::Conflicted(ConflictKind::Add)
        };
        records.push(Record {
            path: path.clone(),
            action,
            old: None,
            new: Some(new_fp.clone()),
            live: Some(live_fp),
        });
    }

    Ok(records)
}
