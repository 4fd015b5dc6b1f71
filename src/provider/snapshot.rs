//! Immutable view of the exposed configuration.

use crate::flatten::FlatMap;

/// Flat map and the etag of the document revision it came from.
///
/// Published as a unit so readers never pair a map with another revision's etag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSnapshot {
    data: FlatMap,
    etag: String,
    generation: u64,
}

impl ConfigSnapshot {
    pub(crate) fn new(data: FlatMap, etag: String, generation: u64) -> Self {
        Self {
            data,
            etag,
            generation,
        }
    }

    /// Flattened key/value pairs.
    pub fn data(&self) -> &FlatMap {
        &self.data
    }

    /// Etag of the source document; empty until the first successful load.
    pub fn etag(&self) -> &str {
        &self.etag
    }

    /// Number of successful reloads that led to this snapshot.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Case-insensitive lookup, see [`FlatMap::get`].
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.data.get(key)
    }
}
