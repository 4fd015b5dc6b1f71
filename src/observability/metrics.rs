//! Reload metrics.
//!
//! # Metrics
//! - `docstore_config_reloads_total` (counter): reloads by outcome
//!   (`changed`, `unchanged`, `failed`, `cancelled`)
//! - `docstore_config_reload_duration_seconds` (histogram): fetch + parse time
//! - `docstore_config_keys` (gauge): keys in the current snapshot

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_reload(outcome: &'static str, elapsed: Duration) {
    ::metrics::counter!("docstore_config_reloads_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("docstore_config_reload_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_snapshot_keys(keys: usize) {
    ::metrics::gauge!("docstore_config_keys").set(keys as f64);
}
