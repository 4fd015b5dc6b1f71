//! Sub-key pickers choosing which part of the document gets flattened.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

type PickFn = dyn Fn(Value) -> Option<Value> + Send + Sync;

/// Narrows a parsed document to the sub-tree that should be exposed.
///
/// Keys of the picked sub-tree are relative to it, so picking `settings`
/// from `{"settings": {"a": 1}}` yields the key `a`, not `settings:a`.
#[derive(Clone)]
pub struct SubKeyPicker {
    pick: Arc<PickFn>,
    description: String,
}

impl SubKeyPicker {
    /// Use the whole document.
    pub fn root() -> Self {
        Self {
            pick: Arc::new(|root: Value| Some(root)),
            description: "<root>".to_string(),
        }
    }

    /// Use a custom selection function. Returning `None` fails the reload.
    pub fn from_fn<F>(pick: F) -> Self
    where
        F: Fn(Value) -> Option<Value> + Send + Sync + 'static,
    {
        Self {
            pick: Arc::new(pick),
            description: "<custom>".to_string(),
        }
    }

    /// Descend along a dotted path. Segments name object members (case
    /// sensitive) or, inside arrays, zero-based indices.
    pub fn path(path: &str) -> Self {
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        Self {
            pick: Arc::new(move |root| descend(root, &segments)),
            description: path.to_string(),
        }
    }

    /// Apply the picker to a parsed document.
    pub fn pick(&self, root: Value) -> Option<Value> {
        (self.pick)(root)
    }

    /// Human-readable form used in errors and logs.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl Default for SubKeyPicker {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Debug for SubKeyPicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SubKeyPicker").field(&self.description).finish()
    }
}

fn descend(mut current: Value, segments: &[String]) -> Option<Value> {
    for segment in segments {
        current = match current {
            Value::Object(mut members) => members.remove(segment)?,
            Value::Array(mut items) => {
                let index: usize = segment.parse().ok()?;
                if index >= items.len() {
                    return None;
                }
                items.swap_remove(index)
            }
            _ => return None,
        };
    }
    Some(current)
}
