//! Recursive three-way merge for structured-config files
//!
//! Instead of merging config files line by line, the three parsed value
//! trees (before = at generation time, current = live, after = regenerated)
//! are walked together so a conflict is isolated to the smallest sub-key
//! possible. Only plain objects recurse; arrays and scalars merge
//! atomically.

use crate::error::Result;
use serde_json::Value;

/// Per-key-path outcome of a structural value merge
#[derive(Debug, Clone, PartialEq)]
pub struct MergeNode {
    /// Key path from the document root to the diverging key
    pub keys: Vec<String>,
    /// Value recorded for this key; `None` deletes the key
    pub final_value: Option<Value>,
    /// Conflicting nodes only update the "after" document
    pub is_conflict: bool,
}

/// Result of structurally merging one config file
#[derive(Debug)]
pub struct ConfigMergeOutcome {
    /// Rendered document with all non-conflicting changes folded in
    pub current: String,
    /// Rendered document as the fully upgraded template would have it
    pub after: String,
    /// Whether any node conflicted
    pub has_conflicts: bool,
}

/// Recursive three-way diff of parsed config values.
///
/// The `before` value arbitrates: a key the user never touched takes the
/// template's new value, a key the template didn't change keeps the
/// user's, and a key both sides changed differently is a conflict carrying
/// the new value for visibility.
pub fn config_diff(
    before: Option<&Value>,
    current: Option<&Value>,
    after: Option<&Value>,
    keys: &[String],
) -> Vec<MergeNode> {
    if value_eq(current, after) {
        return Vec::new();
    }

    if let (Some(Value::Object(cur)), Some(Value::Object(aft))) = (current, after) {
        let mut union: Vec<&String> = cur.keys().collect();
        for key in aft.keys() {
            if !cur.contains_key(key) {
                union.push(key);
            }
        }

        let mut nodes = Vec::new();
        for key in union {
            let mut child_keys = keys.to_vec();
            child_keys.push(key.clone());
            nodes.extend(config_diff(
                before.and_then(|b| b.get(key)),
                cur.get(key),
                aft.get(key),
                &child_keys,
            ));
        }
        return nodes;
    }

    if value_eq(before, current) {
        // User hasn't touched this key since generation
        return vec![MergeNode {
            keys: keys.to_vec(),
            final_value: after.cloned(),
            is_conflict: false,
        }];
    }
    if value_eq(before, after) {
        // Template didn't actually change this key's resolved value
        return vec![MergeNode {
            keys: keys.to_vec(),
            final_value: current.cloned(),
            is_conflict: false,
        }];
    }

    vec![MergeNode {
        keys: keys.to_vec(),
        final_value: after.cloned(),
        is_conflict: true,
    }]
}

/// Fold merge nodes into two copies of `base`: `current` receives only
/// non-conflicting changes, `after` additionally carries conflicting new
/// values, so no live data is silently lost.
pub fn apply_changes(base: &Value, changes: &[MergeNode]) -> (Value, Value) {
    let mut current = base.clone();
    let mut after = base.clone();

    for change in changes {
        let Some((last, parents)) = change.keys.split_last() else {
            // Empty key path: the whole document diverged
            if let Some(value) = &change.final_value {
                after = value.clone();
                if !change.is_conflict {
                    current = value.clone();
                }
            }
            continue;
        };

        if !change.is_conflict {
            set_at(&mut current, parents, last, change.final_value.as_ref());
        }
        set_at(&mut after, parents, last, change.final_value.as_ref());
    }

    (current, after)
}

/// Structurally merge one config file. Returns `Ok(None)` when any of the
/// three snapshots fails to parse; the caller falls back to plain text
/// conflict handling with a warning.
pub fn merge_config_file(
    before: &str,
    current: &str,
    after: &str,
) -> Result<Option<ConfigMergeOutcome>> {
    let Ok(before_val) = serde_json::from_str::<Value>(before) else {
        return Ok(None);
    };
    let Ok(current_val) = serde_json::from_str::<Value>(current) else {
        return Ok(None);
    };
    let Ok(after_val) = serde_json::from_str::<Value>(after) else {
        return Ok(None);
    };

    let nodes = config_diff(Some(&before_val), Some(&current_val), Some(&after_val), &[]);
    let has_conflicts = nodes.iter().any(|n| n.is_conflict);
    let (current_doc, after_doc) = apply_changes(&current_val, &nodes);

    Ok(Some(ConfigMergeOutcome {
        current: render(&current_doc)?,
        after: render(&after_doc)?,
        has_conflicts,
    }))
}

fn value_eq(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Descend to the parent of `key`, creating intermediate objects when a
/// template added a nested key, then set or delete the final key
fn set_at(doc: &mut Value, parents: &[String], key: &str, value: Option<&Value>) {
    let mut node = doc;
    for parent in parents {
        let Some(map) = node.as_object_mut() else {
            // Type changed along the path; nothing to fold in here
            return;
        };
        node = map
            .entry(parent.clone())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
    }
    if let Some(map) = node.as_object_mut() {
        match value {
            Some(v) => {
                map.insert(key.to_string(), v.clone());
            }
            None => {
                map.remove(key);
            }
        }
    }
}

fn render(value: &Value) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}
