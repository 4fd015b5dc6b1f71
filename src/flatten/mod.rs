//! JSON document flattening.
//!
//! # Data Flow
//! ```text
//! serde_json::Value (document root, or the sub-tree chosen by a picker)
//!     → parser.rs (depth-first walk, path segments joined by a delimiter)
//!     → map.rs (case-insensitive FlatMap, duplicate keys rejected)
//! ```
//!
//! # Rules
//! - Object members become `parent:name`, array elements become `parent:0`, `parent:1`, ...
//! - Scalars render as their literal text; JSON `null` becomes a missing value (`None`)
//! - Empty objects and arrays below the root record their own path with `None`
//! - The root has no path, so an empty root yields an empty map

pub mod map;
pub mod parser;

pub use map::{ConfigKey, FlatMap};
pub use parser::{flatten, flatten_into, DEFAULT_DELIMITER};
