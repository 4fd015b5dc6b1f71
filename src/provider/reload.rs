//! Conditional reload of a document into a flat configuration snapshot.
//!
//! # Flow
//! ```text
//! reload(cancel)
//!     → lock (one fetch at a time per provider)
//!     → read_document(id, partition, if_none_match = current etag)
//!     → NotModified / NotFound: Ok(false), nothing changes
//!     → Found: parse → pick sub-key → flatten → swap snapshot → notify
//! ```
//!
//! A failed parse or flatten leaves the previous snapshot and etag in place,
//! so the next reload presents the old etag and fetches the document again.

use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use bytes::Bytes;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;

use crate::error::{FormatError, ReloadError, ReloadResult};
use crate::flatten::{flatten, FlatMap};
use crate::observability::metrics;
use crate::provider::options::ProviderOptions;
use crate::provider::snapshot::ConfigSnapshot;
use crate::store::{ReadOutcome, StoreError};

/// Anything that can be asked to refresh itself from its source.
#[async_trait]
pub trait Refresher: Send + Sync {
    /// Reload from the source. Returns `true` when the configuration changed.
    ///
    /// Implementations log their own failures; callers only count them.
    async fn reload(&self, cancel: &CancellationToken) -> ReloadResult<bool>;
}

/// Exposes one remote JSON document as a flat, reloadable configuration map.
pub struct DocumentConfigProvider {
    options: ProviderOptions,
    current: ArcSwap<ConfigSnapshot>,
    reload_lock: Mutex<()>,
    notifier: watch::Sender<u64>,
}

impl DocumentConfigProvider {
    /// Create a provider with an empty snapshot. Nothing is fetched until
    /// [`load`](Self::load) or [`reload`](Self::reload) is called.
    pub fn new(options: ProviderOptions) -> Self {
        let (notifier, _) = watch::channel(0);
        Self {
            options,
            current: ArcSwap::from_pointee(ConfigSnapshot::default()),
            reload_lock: Mutex::new(()),
            notifier,
        }
    }

    pub fn options(&self) -> &ProviderOptions {
        &self.options
    }

    /// Current snapshot (map and etag together).
    pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
        self.current.load_full()
    }

    /// Case-insensitive lookup in the current snapshot.
    pub fn get(&self, key: &str) -> Option<Option<String>> {
        self.current
            .load()
            .get(key)
            .map(|value| value.map(str::to_string))
    }

    /// Etag held for the next conditional read; empty means "always fetch".
    pub fn etag(&self) -> String {
        self.current.load().etag().to_string()
    }

    /// Subscribe to reload notifications. The value is the snapshot generation
    /// and changes after every reload that replaced the snapshot.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notifier.subscribe()
    }

    /// Fetch the document if it changed since the last successful reload.
    ///
    /// Returns `Ok(false)` when the store reports the document as unchanged or
    /// missing. Concurrent calls on one provider are serialized.
    pub async fn reload(&self, cancel: &CancellationToken) -> ReloadResult<bool> {
        let started = Instant::now();
        let result = self.reload_inner(cancel).await;

        match &result {
            Ok(true) => metrics::record_reload("changed", started.elapsed()),
            Ok(false) => metrics::record_reload("unchanged", started.elapsed()),
            Err(ReloadError::Cancelled) => metrics::record_reload("cancelled", started.elapsed()),
            Err(e) => {
                metrics::record_reload("failed", started.elapsed());
                tracing::warn!(
                    document_id = %self.options.document_id,
                    error = %e,
                    "Reload failed, keeping current configuration"
                );
            }
        }

        result
    }

    /// Blocking initial load. Discards the changed flag but surfaces errors.
    ///
    /// Inside a multi-threaded runtime the current worker is handed over for
    /// the duration of the call. Outside any runtime the reload runs on a
    /// private current-thread runtime. A current-thread runtime cannot be
    /// blocked without stalling the tasks a store may depend on, so there
    /// this returns [`ReloadError::BlockingOnCurrentThread`]; use
    /// [`reload`](Self::reload) instead.
    pub fn load(&self) -> ReloadResult<()> {
        let cancel = CancellationToken::new();
        let changed = match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(self.reload(&cancel)))
            }
            Ok(_) => Err(ReloadError::BlockingOnCurrentThread),
            Err(_) => self.load_on_private_runtime(&cancel),
        }?;

        tracing::debug!(
            document_id = %self.options.document_id,
            changed,
            "Initial load complete"
        );
        Ok(())
    }

    fn load_on_private_runtime(&self, cancel: &CancellationToken) -> ReloadResult<bool> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StoreError::Transport(format!("cannot start runtime: {}", e)))?;
        runtime.block_on(self.reload(cancel))
    }

    async fn reload_inner(&self, cancel: &CancellationToken) -> ReloadResult<bool> {
        let _guard = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ReloadError::Cancelled),
            guard = self.reload_lock.lock() => guard,
        };

        // Read under the lock so an overlapping reload can't pair a stale
        // etag with a newer snapshot.
        let current = self.current.load_full();
        let held_etag = (!current.etag().is_empty()).then_some(current.etag());
        let options = &self.options;

        let read = options
            .store
            .read_document(&options.document_id, &options.partition_key, held_etag);
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ReloadError::Cancelled),
            outcome = read => outcome?,
        };

        let (content, etag) = match outcome {
            ReadOutcome::NotModified => {
                tracing::debug!(document_id = %options.document_id, "ETag matched - no update");
                return Ok(false);
            }
            ReadOutcome::NotFound => {
                tracing::debug!(document_id = %options.document_id, "Document not found - no update");
                return Ok(false);
            }
            ReadOutcome::Found { content, etag } => (content, etag),
        };

        let data = self.parse(&content)?;
        let keys = data.len();
        let next = Arc::new(ConfigSnapshot::new(data, etag, current.generation() + 1));
        let generation = next.generation();
        self.current.store(next);
        self.notifier.send_replace(generation);

        metrics::record_snapshot_keys(keys);
        tracing::info!(
            document_id = %options.document_id,
            etag = %self.current.load().etag(),
            keys,
            generation,
            "Configuration reloaded"
        );
        Ok(true)
    }

    fn parse(&self, content: &Bytes) -> Result<FlatMap, FormatError> {
        let document: serde_json::Value = serde_json::from_slice(content)?;
        let picker = &self.options.picker;
        let root = picker
            .pick(document)
            .ok_or_else(|| FormatError::SubKeyNotFound(picker.description().to_string()))?;
        flatten(&root, &self.options.delimiter)
    }
}

#[async_trait]
impl Refresher for DocumentConfigProvider {
    async fn reload(&self, cancel: &CancellationToken) -> ReloadResult<bool> {
        DocumentConfigProvider::reload(self, cancel).await
    }
}
