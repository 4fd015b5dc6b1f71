//! Document store access.
//!
//! # Data Flow
//! ```text
//! Reload controller
//!     → DocumentStore::read_document(id, partition, if_none_match = held etag)
//!     → NotModified | NotFound | Found { content, etag }
//! ```
//!
//! # Implementations
//! - http.rs: REST document endpoint over reqwest
//! - memory.rs: in-process store with generated etags
//!
//! Retry and backoff are left to the store implementation; the controller
//! surfaces the first error it sees.

pub mod http;
pub mod memory;
pub mod types;

pub use http::HttpDocumentStore;
pub use memory::MemoryDocumentStore;
pub use types::{DocumentStore, PartitionKey, ReadOutcome, StoreError, StoreResult};
