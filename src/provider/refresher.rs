//! Periodic background reloads.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::ReloadError;
use crate::provider::reload::Refresher;

/// Counts of reload outcomes over the life of a [`RefreshTask`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshStats {
    pub changed: u64,
    pub unchanged: u64,
    pub failed: u64,
}

/// Drives a [`Refresher`] on a fixed interval until shutdown.
///
/// The first reload happens one interval after start; the initial load is the
/// host's job. Failures are counted and the next tick tries again.
pub struct RefreshTask {
    refresher: Arc<dyn Refresher>,
    interval: Duration,
}

impl RefreshTask {
    pub fn new(refresher: Arc<dyn Refresher>, interval: Duration) -> Self {
        Self {
            refresher,
            interval,
        }
    }

    /// Run until `shutdown` is cancelled. An in-flight reload is cancelled too.
    pub async fn run(self, shutdown: CancellationToken) -> RefreshStats {
        tracing::info!(interval_secs = self.interval.as_secs(), "Refresh task starting");

        let mut stats = RefreshStats::default();
        let mut ticker = time::interval_at(time::Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            match self.refresher.reload(&shutdown).await {
                Ok(true) => {
                    stats.changed += 1;
                    tracing::info!("Updated");
                }
                Ok(false) => {
                    stats.unchanged += 1;
                    tracing::debug!("Etag matched - no update");
                }
                Err(ReloadError::Cancelled) => break,
                // Already logged by the refresher
                Err(_) => stats.failed += 1,
            }
        }

        tracing::info!(
            changed = stats.changed,
            unchanged = stats.unchanged,
            failed = stats.failed,
            "Refresh task stopped"
        );
        stats
    }
}
