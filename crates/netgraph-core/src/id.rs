//! Synthesized identifiers.
//!
//! Subnets and attachments have no natural global identifier in the source
//! configuration, so they are keyed by the owning VPC name. Both helpers take
//! optional parts and degrade to whatever is present instead of failing.

/// Join a scope and a name as `"<scope>-<name>"` when both are present and non-empty.
pub fn join_id(scope: Option<&str>, name: Option<&str>) -> Option<String> {
    match (non_empty(scope), non_empty(name)) {
        (Some(scope), Some(name)) => Some(format!("{scope}-{name}")),
        _ => None,
    }
}

/// Like [`join_id`], but falls back to the bare name when the scope is missing.
///
/// An empty name is passed through as-is so that it stays distinguishable from
/// an absent one.
pub fn scoped_id(scope: Option<&str>, name: Option<&str>) -> Option<String> {
    join_id(scope, name).or_else(|| name.map(str::to_string))
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
