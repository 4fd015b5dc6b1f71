//! Reloadable configuration provider backed by a single JSON document.
//!
//! # Data Flow
//! ```text
//! host startup → provider.load()              (blocking, first fetch)
//! RefreshTask  → provider.reload(cancel)       (periodic, conditional on etag)
//!     → store read → parse → picker → flatten → snapshot swap → subscribers
//! readers      → provider.snapshot() / get()   (lock-free, whole snapshots only)
//! ```

pub mod options;
pub mod picker;
pub mod refresher;
pub mod reload;
pub mod snapshot;

pub use options::{ProviderOptions, ProviderOptionsBuilder};
pub use picker::SubKeyPicker;
pub use refresher::{RefreshStats, RefreshTask};
pub use reload::{DocumentConfigProvider, Refresher};
pub use snapshot::ConfigSnapshot;
