//! Path lookups over untyped JSON documents.
//!
//! A lookup walks one step at a time and gives up the moment a step cannot
//! be taken: a key on something that is not a mapping, an index on something
//! that is not a sequence, an out-of-range index, a missing key or a `null`.

use serde_json::Value;

/// One step of a lookup path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStep<'a> {
    Key(&'a str),
    Index(usize),
}

/// Resolves `path` from `root`, returning `None` as soon as any step fails.
///
/// An empty path resolves to `root` itself (unless it is `null`).
#[must_use]
pub fn lookup<'v>(root: &'v Value, path: &[PathStep<'_>]) -> Option<&'v Value> {
    let mut current = root;
    for step in path {
        let next = match (current, step) {
            (Value::Object(map), PathStep::Key(key)) => map.get(*key),
            (Value::Array(items), PathStep::Index(index)) => items.get(*index),
            _ => None,
        };
        current = next?;
        if current.is_null() {
            return None;
        }
    }
    (!current.is_null()).then_some(current)
}

/// Resolves `path` to a scalar rendered as text, or `default`.
///
/// Strings are returned as-is; numbers and booleans use their JSON text.
/// Mappings and sequences are not text and also yield `default`.
#[must_use]
pub fn lookup_text(root: &Value, path: &[PathStep<'_>], default: &str) -> String {
    match lookup(root, path) {
        Some(Value::String(s)) => s.clone(),
        Some(scalar @ (Value::Number(_) | Value::Bool(_))) => scalar.to_string(),
        _ => default.to_string(),
    }
}
