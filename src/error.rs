//! Error types shared by the flattener and the reload controller.

use thiserror::Error;

use crate::store::StoreError;

/// The document could not be turned into a flat map.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Document bytes are not valid JSON.
    #[error("Malformed JSON document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Two branches of the document produced the same key (keys ignore case).
    #[error("Duplicate key {0}")]
    DuplicateKey(String),

    /// The root handed to the flattener is a bare scalar with no path of its own.
    #[error("Document root must be an object or array, got {0}")]
    ScalarRoot(&'static str),

    /// The sub-key picker found nothing to flatten.
    #[error("Sub-key not found in document: {0}")]
    SubKeyNotFound(String),
}

/// Result type for flattening.
pub type FormatResult<T> = Result<T, FormatError>;

/// Errors surfaced by a reload attempt.
///
/// Every variant leaves the previous snapshot and etag in place.
#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("Document store error: {0}")]
    Transport(#[from] StoreError),

    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Reload cancelled")]
    Cancelled,

    /// Blocking `load()` was called on a current-thread runtime.
    #[error("Blocking load is not possible on a current-thread runtime, use reload().await")]
    BlockingOnCurrentThread,
}

/// Result type for reload operations.
pub type ReloadResult<T> = Result<T, ReloadError>;

/// Invalid construction parameters, raised before any network activity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("Missing required option: {0}")]
    Missing(&'static str),

    #[error("Option {0} must not be empty")]
    Empty(&'static str),
}
