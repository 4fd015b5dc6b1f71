//! Remote JSON document as a flat, reloadable configuration source.
//!
//! A document is read from a document store, optionally narrowed to a
//! sub-tree, and flattened into `section:key → value` pairs. Reloads are
//! conditional on the document's etag, so an unchanged document is neither
//! transferred nor parsed again.

pub mod config;
pub mod error;
pub mod flatten;
pub mod lifecycle;
pub mod observability;
pub mod provider;
pub mod store;

pub use error::{ArgumentError, FormatError, ReloadError};
pub use flatten::{flatten, FlatMap};
pub use lifecycle::Shutdown;
pub use provider::{
    ConfigSnapshot, DocumentConfigProvider, ProviderOptions, Refresher, RefreshTask, SubKeyPicker,
};
pub use store::{DocumentStore, HttpDocumentStore, MemoryDocumentStore, PartitionKey, ReadOutcome};
