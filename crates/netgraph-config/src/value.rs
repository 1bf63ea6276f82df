//! Lookup-or-default access over untyped YAML trees.
//!
//! The network configuration has no enforced schema, so every read goes
//! through these helpers. None of them fail: a missing key, a `null`, or a
//! value of the wrong kind all collapse to the documented default.

use serde_json::{Map, Number, Value as JsonValue};
use serde_yaml::Value;

/// Look up `key` in a mapping. Non-mappings and `null` values yield `None`.
pub fn get<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| !v.is_null())
}

/// Render a scalar as a string. Sequences, mappings and `null` yield `None`.
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// A scalar field as a string. Empty strings are returned as-is.
pub fn str_field(value: &Value, key: &str) -> Option<String> {
    get(value, key).and_then(scalar_string)
}

/// The first of `keys` holding a non-empty scalar.
pub fn first_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| str_field(value, key))
        .find(|s| !s.is_empty())
}

/// A sequence field, or an empty slice when absent or not a sequence.
pub fn seq<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    get(value, key)
        .and_then(Value::as_sequence)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// The mapping elements of a sequence field. Anything else is skipped.
pub fn mappings<'a>(value: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> + use<'a> {
    seq(value, key).iter().filter(|v| v.is_mapping())
}

/// A field carried through verbatim, `null` when absent.
pub fn json_field(value: &Value, key: &str) -> JsonValue {
    get(value, key).map(to_json).unwrap_or(JsonValue::Null)
}

/// A field carried through verbatim, an empty list when absent.
pub fn json_list_field(value: &Value, key: &str) -> JsonValue {
    get(value, key)
        .map(to_json)
        .unwrap_or_else(|| JsonValue::Array(Vec::new()))
}

/// Convert a YAML tree to JSON.
///
/// Total over every YAML value: non-string keys are stringified, tags are
/// dropped in favour of the tagged value, and non-finite floats become `null`.
pub fn to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                JsonValue::from(i)
            } else if let Some(u) = n.as_u64() {
                JsonValue::from(u)
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map(JsonValue::Number)
                    .unwrap_or(JsonValue::Null)
            }
        }
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Sequence(items) => JsonValue::Array(items.iter().map(to_json).collect()),
        Value::Mapping(mapping) => {
            let mut out = Map::with_capacity(mapping.len());
            for (k, v) in mapping {
                out.insert(key_string(k), to_json(v));
            }
            JsonValue::Object(out)
        }
        Value::Tagged(tagged) => to_json(&tagged.value),
    }
}

/// Render any value as inline text: scalars as themselves, `null` as empty,
/// collections as compact JSON.
pub fn inline_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => scalar_string(other).unwrap_or_else(|| to_json(other).to_string()),
    }
}

fn key_string(key: &Value) -> String {
    match key {
        Value::Null => "null".to_string(),
        other => inline_string(other),
    }
}
