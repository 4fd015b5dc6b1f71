//! Case-insensitive flat configuration map.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A flattened configuration key.
///
/// Keeps the spelling it was created with, but compares, orders and hashes
/// case-insensitively so `Logging:Level` and `logging:level` are the same key.
/// Folding is per-character uppercase; characters whose uppercase form is
/// several characters (`ß` → `SS`) fold to that longer form.
#[derive(Debug, Clone)]
pub struct ConfigKey(String);

impl ConfigKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as originally spelled.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn folded(&self) -> impl Iterator<Item = char> + '_ {
        self.0.chars().flat_map(char::to_uppercase)
    }
}

impl PartialEq for ConfigKey {
    fn eq(&self, other: &Self) -> bool {
        self.folded().eq(other.folded())
    }
}

impl Eq for ConfigKey {}

impl Ord for ConfigKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded().cmp(other.folded())
    }
}

impl PartialOrd for ConfigKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for ConfigKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.folded() {
            c.hash(state);
        }
        0xffu8.hash(state);
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConfigKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for ConfigKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Flat `key → value` view of a document.
///
/// Values are `None` for JSON `null` and for empty containers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatMap {
    entries: BTreeMap<ConfigKey, Option<String>>,
}

impl FlatMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key that must not be present yet.
    ///
    /// Returns the rejected key back if an equal (case-insensitive) key exists.
    pub fn try_insert(&mut self, key: ConfigKey, value: Option<String>) -> Result<(), ConfigKey> {
        if self.entries.contains_key(&key) {
            return Err(key);
        }
        self.entries.insert(key, value);
        Ok(())
    }

    /// Look up a key, ignoring case.
    ///
    /// The outer `Option` tells whether the key exists, the inner one carries
    /// the value (`None` for null or empty containers).
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries
            .get(&ConfigKey::from(key))
            .map(|value| value.as_deref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&ConfigKey::from(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in case-insensitive key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }
}

impl Serialize for FlatMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}
