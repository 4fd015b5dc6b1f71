//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! provider / refresh task produce:
//!     → tracing events (document_id, etag, key counts)
//!     → metrics.rs (reload counters, snapshot size, reload latency)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Library code only emits events; the binary installs the subscriber
//! - Metrics are recorded even when no exporter is installed (no-op recorder)

pub mod logging;
pub mod metrics;
