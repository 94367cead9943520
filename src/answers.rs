//! The "bag of answers" collected when a package is generated
//!
//! Answers are an open mapping from prompt keys to tagged values. Keys with
//! first-class meaning are enumerated here; feature flags are validated at
//! the generator boundary rather than treated as an untyped blob.

use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Answer key holding the package name
pub const KEY_NAME: &str = "name";

/// Answer key holding the enabled feature flags
pub const KEY_FEATURES: &str = "features";

/// A single prompt answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<String>),
}

/// Ordered mapping of prompt answers, persisted with each snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(IndexMap<String, AnswerValue>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse answers from a JSON object string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: AnswerValue) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.0.get(key)
    }

    /// Package name answer, when present
    pub fn name(&self) -> Option<&str> {
        match self.0.get(KEY_NAME) {
            Some(AnswerValue::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Enabled feature flags. A bare string answer counts as a single flag.
    pub fn features(&self) -> Vec<&str> {
        match self.0.get(KEY_FEATURES) {
            Some(AnswerValue::List(flags)) => flags.iter().map(String::as_str).collect(),
            Some(AnswerValue::String(flag)) => vec![flag.as_str()],
            _ => Vec::new(),
        }
    }

    /// Feature flags not recognized by the consuming generator
    pub fn unknown_features(&self, known: &[String]) -> Vec<String> {
        self.features()
            .iter()
            .filter(|flag| !known.iter().any(|k| k == *flag))
            .map(|flag| flag.to_string())
            .collect()
    }
}

/// Convert an arbitrary package name to kebab-case for filesystem paths
pub fn to_kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if ch.is_uppercase() {
                if prev_lower {
                    out.push('-');
                }
                out.extend(ch.to_lowercase());
                prev_lower = false;
            } else {
                out.push(ch);
                prev_lower = true;
            }
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
            prev_lower = false;
        }
    }
    out.trim_end_matches('-').to_string()
}
