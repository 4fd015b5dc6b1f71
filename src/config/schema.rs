//! Settings schema definitions.

use serde::Deserialize;

use crate::flatten::DEFAULT_DELIMITER;

/// Root settings for the refresh daemon.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Which document to expose.
    pub document: DocumentConfig,

    /// Document store connection.
    pub store: StoreConfig,

    /// Periodic reload.
    pub refresh: RefreshConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Document identity and flattening options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Document id. Required.
    pub id: String,

    /// Partition key; absent means the null partition.
    pub partition_key: Option<String>,

    /// Dotted path of the sub-tree to expose (e.g. "settings.app").
    pub sub_key: Option<String>,

    /// Separator between key segments.
    pub delimiter: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            partition_key: None,
            sub_key: None,
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }
}

/// Document store endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the document endpoint.
    pub endpoint: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Optional bearer token.
    pub api_key: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8081".to_string(),
            timeout_secs: 10,
            api_key: None,
        }
    }
}

/// Periodic refresh configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Enable periodic reloads after the initial load.
    pub enabled: bool,

    /// Seconds between reloads.
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 180, // 20 times an hour
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
