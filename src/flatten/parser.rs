//! Depth-first flattening of a JSON value tree.

use serde_json::Value;

use crate::error::{FormatError, FormatResult};
use crate::flatten::map::{ConfigKey, FlatMap};

/// Segment separator used for keys unless configured otherwise.
pub const DEFAULT_DELIMITER: &str = ":";

/// Flatten `root` into a new map, joining path segments with `delimiter`.
pub fn flatten(root: &Value, delimiter: &str) -> FormatResult<FlatMap> {
    let mut out = FlatMap::new();
    flatten_into(root, delimiter, &mut out)?;
    Ok(out)
}

/// Flatten `root` into an existing map.
///
/// Fails on the first key already present in `out`, so merging two trees that
/// share a key is an error rather than an overwrite. `out` may hold the keys
/// written before the failure; callers that need all-or-nothing should flatten
/// into a fresh map.
pub fn flatten_into(root: &Value, delimiter: &str, out: &mut FlatMap) -> FormatResult<()> {
    match root {
        Value::Object(_) | Value::Array(_) => visit(root, None, delimiter, out),
        other => Err(FormatError::ScalarRoot(kind_name(other))),
    }
}

fn visit(value: &Value, path: Option<&str>, delimiter: &str, out: &mut FlatMap) -> FormatResult<()> {
    match value {
        Value::Object(members) => {
            for (name, child) in members {
                let key = child_path(path, name, delimiter);
                visit(child, Some(&key), delimiter, out)?;
            }
            if members.is_empty() {
                record_empty(path, out)?;
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                let key = child_path(path, &index.to_string(), delimiter);
                visit(child, Some(&key), delimiter, out)?;
            }
            if items.is_empty() {
                record_empty(path, out)?;
            }
        }
        scalar => {
            // Only reachable below the root, so a path always exists.
            if let Some(path) = path {
                record(path, render_scalar(scalar), out)?;
            }
        }
    }
    Ok(())
}

fn child_path(parent: Option<&str>, segment: &str, delimiter: &str) -> String {
    match parent {
        Some(parent) => format!("{parent}{delimiter}{segment}"),
        None => segment.to_string(),
    }
}

/// Empty containers below the root keep their key with no value.
fn record_empty(path: Option<&str>, out: &mut FlatMap) -> FormatResult<()> {
    match path {
        Some(path) => record(path, None, out),
        None => Ok(()),
    }
}

fn record(path: &str, value: Option<String>, out: &mut FlatMap) -> FormatResult<()> {
    out.try_insert(ConfigKey::new(path), value)
        .map_err(|key| FormatError::DuplicateKey(key.as_str().to_string()))
}

fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
