//! Replacement table construction.
//!
//! The replacement document looks like:
//!
//! ```yaml
//! globalReplacements:
//!   - key: AcceleratorHomeRegion
//!     type: String
//!     value: ca-central-1
//!   - key: SandboxAllowedRegions
//!     type: StringList
//!     value: [ca-central-1, us-east-1]
//! ```
//!
//! Anything that does not have this shape yields an empty table.

use serde_yaml::Value;
use std::collections::HashMap;

use crate::ConfigResult;
use crate::render::parse_yaml;
use crate::value::{get, inline_string, scalar_string, seq, str_field};

/// Name of the top-level replacement list.
pub const GLOBAL_REPLACEMENTS_KEY: &str = "globalReplacements";

/// Declared type of a replacement entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacementType {
    String,
    StringList,
}

impl From<&str> for ReplacementType {
    fn from(s: &str) -> Self {
        match s {
            "StringList" => Self::StringList,
            // Every other declared type is treated as a plain string.
            _ => Self::String,
        }
    }
}

/// A resolved replacement value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplacementValue {
    Str(String),
    List(Vec<String>),
}

impl ReplacementValue {
    /// Text substituted into the document. Lists are comma-joined.
    pub fn as_replacement_text(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::List(items) => items.join(","),
        }
    }
}

impl From<&str> for ReplacementValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<Vec<String>> for ReplacementValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// Key to value lookup table, iterated in insertion order.
///
/// Re-inserting a key replaces its value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementTable {
    entries: Vec<(String, ReplacementValue)>,
    index: HashMap<String, usize>,
}

impl ReplacementTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ReplacementValue>) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ReplacementValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ReplacementValue> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReplacementValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the replacement table from a parsed replacement document.
pub fn build_replacements(doc: &Value) -> ReplacementTable {
    let mut table = ReplacementTable::new();

    for item in seq(doc, GLOBAL_REPLACEMENTS_KEY) {
        if !item.is_mapping() {
            continue;
        }
        let Some(key) = get(item, "key").and_then(scalar_string) else {
            continue;
        };
        let kind = str_field(item, "type")
            .map(|t| ReplacementType::from(t.as_str()))
            .unwrap_or(ReplacementType::String);
        let value = get(item, "value");

        let resolved = match kind {
            ReplacementType::StringList => ReplacementValue::List(match value {
                None => Vec::new(),
                Some(Value::Sequence(items)) => items.iter().map(inline_string).collect(),
                Some(scalar) => vec![inline_string(scalar)],
            }),
            ReplacementType::String => {
                ReplacementValue::Str(value.map(inline_string).unwrap_or_default())
            }
        };

        table.insert(key, resolved);
    }

    table
}

/// Parse a replacement document and build its table.
///
/// Only a YAML syntax error is fatal; a well-formed document of the wrong
/// shape yields an empty table.
pub fn build_replacements_from_str(text: &str) -> ConfigResult<ReplacementTable> {
    let doc = parse_yaml("replacements", text)?;
    Ok(build_replacements(&doc))
}
