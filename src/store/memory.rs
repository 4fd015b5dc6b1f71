//! In-process document store.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use uuid::Uuid;

use crate::store::types::{DocumentStore, PartitionKey, ReadOutcome, StoreError, StoreResult};

#[derive(Debug, Clone)]
struct StoredDocument {
    content: Bytes,
    etag: String,
}

/// A thread-safe document store held in memory.
///
/// Every `put` assigns a fresh etag. Latency and outages can be injected to
/// exercise cancellation and transport failures.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: DashMap<(String, PartitionKey), StoredDocument>,
    reads: AtomicU64,
    latency_ms: AtomicU64,
    offline: AtomicBool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw document bytes and return the new etag.
    pub fn put(&self, id: &str, partition: PartitionKey, content: impl Into<Bytes>) -> String {
        let etag = format!("\"{}\"", Uuid::new_v4());
        self.documents.insert(
            (id.to_string(), partition),
            StoredDocument {
                content: content.into(),
                etag: etag.clone(),
            },
        );
        tracing::debug!(document_id = %id, etag = %etag, "Document stored");
        etag
    }

    /// Store a JSON document and return the new etag.
    pub fn put_json(&self, id: &str, partition: PartitionKey, document: &serde_json::Value) -> String {
        self.put(id, partition, document.to_string())
    }

    pub fn remove(&self, id: &str, partition: &PartitionKey) -> bool {
        self.documents
            .remove(&(id.to_string(), partition.clone()))
            .is_some()
    }

    /// Current etag of a document, if stored.
    pub fn etag(&self, id: &str, partition: &PartitionKey) -> Option<String> {
        self.documents
            .get(&(id.to_string(), partition.clone()))
            .map(|doc| doc.etag.clone())
    }

    /// Number of reads served so far.
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    /// Delay every read by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    /// Make reads fail with a transport error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn read_document(
        &self,
        id: &str,
        partition: &PartitionKey,
        if_none_match: Option<&str>,
    ) -> StoreResult<ReadOutcome> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Transport("store offline".into()));
        }

        let Some(doc) = self.documents.get(&(id.to_string(), partition.clone())) else {
            return Ok(ReadOutcome::NotFound);
        };

        if if_none_match == Some(doc.etag.as_str()) {
            return Ok(ReadOutcome::NotModified);
        }

        Ok(ReadOutcome::Found {
            content: doc.content.clone(),
            etag: doc.etag.clone(),
        })
    }
}
