//! Placeholder substitution on raw configuration text.
//!
//! Supports three placeholder forms, applied per key in this order:
//! - `{{ Key }}`
//! - `{{Key}}`
//! - `${Key}`
//!
//! Substitution is literal text replacement. A key that is a prefix or suffix
//! of another key is not special-cased, so such key sets can substitute
//! partially. Rendering happens before YAML parsing because the placeholder
//! syntax is not itself valid YAML.

use regex::Regex;
use serde_yaml::Value;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::replacements::ReplacementTable;
use crate::{ConfigError, ConfigResult};

// Any placeholder left behind after rendering, in any of the three forms.
static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}|\$\{([A-Za-z0-9_.\-]+)\}").unwrap()
});

/// Substitute every table entry into `raw`, in table order.
pub fn render_text(raw: &str, table: &ReplacementTable) -> String {
    let mut text = raw.to_string();

    for (key, value) in table.iter() {
        let replacement = value.as_replacement_text();
        for placeholder in placeholder_forms(key) {
            if text.contains(&placeholder) {
                text = text.replace(&placeholder, &replacement);
            }
        }
    }

    text
}

/// Render `raw` and parse the result into a YAML tree.
///
/// A parse failure is fatal; there is no partially resolved tree. An empty
/// document resolves to `null`.
pub fn render(raw: &str, table: &ReplacementTable) -> ConfigResult<Value> {
    let text = render_text(raw, table);

    let unresolved = unresolved_placeholders(&text);
    for name in &unresolved {
        warn!(placeholder = %name, "Placeholder has no replacement value");
    }
    debug!(
        keys = table.len(),
        unresolved = unresolved.len(),
        "Rendered network configuration"
    );

    parse_rendered(&text)
}

/// Parse already rendered text. `<<` merge keys are applied.
pub fn parse_rendered(text: &str) -> ConfigResult<Value> {
    parse_yaml("network", text)
}

/// Parse a YAML document and apply its `<<` merge keys. Blank input is `null`.
pub(crate) fn parse_yaml(document: &'static str, text: &str) -> ConfigResult<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    let mut value: Value =
        serde_yaml::from_str(text).map_err(|e| ConfigError::yaml(document, e))?;
    value
        .apply_merge()
        .map_err(|e| ConfigError::yaml(document, e))?;
    Ok(value)
}

/// Names of placeholders still present in `text`, deduplicated, in order of
/// first appearance.
pub fn unresolved_placeholders(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER_REGEX.captures_iter(text) {
        let Some(name) = caps.get(1).or_else(|| caps.get(2)) else {
            continue;
        };
        if !names.iter().any(|n| n == name.as_str()) {
            names.push(name.as_str().to_string());
        }
    }
    names
}

fn placeholder_forms(key: &str) -> [String; 3] {
    [
        format!("{{{{ {key} }}}}"),
        format!("{{{{{key}}}}}"),
        format!("${{{key}}}"),
    ]
}
