//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load settings → Validate → Build store + provider → Initial load → Spawn refresh
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGINT/SIGTERM → Shutdown::trigger → refresh task cancels in-flight reload → Exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
