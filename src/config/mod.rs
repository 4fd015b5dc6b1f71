//! Settings for the refresh daemon.
//!
//! # Data Flow
//! ```text
//! settings file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → Settings (validated, immutable)
//!     → used to build the document store and the config provider
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal files
//! - Validation separates syntactic (serde) from semantic checks
//! - These settings describe where the document lives; the document itself
//!   is what the provider exposes

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_settings, SettingsError};
pub use schema::{DocumentConfig, ObservabilityConfig, RefreshConfig, Settings, StoreConfig};
