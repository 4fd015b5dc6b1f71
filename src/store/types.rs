//! Document store contract and shared types.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Partition a document lives in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum PartitionKey {
    /// The null partition, used when no key is configured.
    #[default]
    None,
    Value(String),
}

impl PartitionKey {
    /// JSON array form used on the wire, e.g. `["tenant-a"]` or `[null]`.
    pub fn header_value(&self) -> String {
        match self {
            PartitionKey::None => serde_json::json!([null]).to_string(),
            PartitionKey::Value(key) => serde_json::json!([key]).to_string(),
        }
    }
}

impl From<Option<String>> for PartitionKey {
    fn from(key: Option<String>) -> Self {
        key.map_or(PartitionKey::None, PartitionKey::Value)
    }
}

impl From<&str> for PartitionKey {
    fn from(key: &str) -> Self {
        PartitionKey::Value(key.to_string())
    }
}

/// Result of a conditional document read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The document still matches the presented etag.
    NotModified,
    /// No document with this id exists in the partition.
    NotFound,
    /// The document changed (or no etag was presented).
    Found { content: Bytes, etag: String },
}

/// Errors raised while talking to the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection or request failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request did not complete in time.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The store answered with a status other than success, 304 or 404.
    #[error("Unexpected status {0} from document store")]
    Status(u16),

    /// The request could not be built.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Conditional read access to a document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a document by id and partition.
    ///
    /// When `if_none_match` is set and still matches the stored etag, the
    /// store answers [`ReadOutcome::NotModified`] without a body.
    async fn read_document(
        &self,
        id: &str,
        partition: &PartitionKey,
        if_none_match: Option<&str>,
    ) -> StoreResult<ReadOutcome>;
}
