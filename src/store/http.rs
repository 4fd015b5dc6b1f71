//! Document store over a REST endpoint.
//!
//! `GET {endpoint}/docs/{id}` with the held etag in `If-None-Match` and the
//! partition in `x-partition-key`. Status mapping:
//! - 304 → not modified
//! - 404 → not found
//! - 2xx → document body, new etag from the `ETag` header
//! - anything else → [`StoreError::Status`]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, ETAG, IF_NONE_MATCH};
use reqwest::StatusCode;
use url::Url;

use crate::config::StoreConfig;
use crate::store::types::{DocumentStore, PartitionKey, ReadOutcome, StoreError, StoreResult};

const PARTITION_HEADER: &str = "x-partition-key";

/// HTTP document store client.
#[derive(Clone)]
pub struct HttpDocumentStore {
    client: reqwest::Client,
    endpoint: Url,
    timeout_secs: u64,
}

impl HttpDocumentStore {
    /// Create a client for the given endpoint.
    pub fn new(endpoint: Url, timeout: Duration, api_key: Option<&str>) -> StoreResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            let value = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| StoreError::InvalidRequest(format!("api key: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            timeout_secs: timeout.as_secs(),
        })
    }

    /// Create a client from the `[store]` settings section.
    pub fn from_config(config: &StoreConfig) -> StoreResult<Self> {
        let endpoint: Url = config.endpoint.parse().map_err(|e| {
            StoreError::InvalidRequest(format!("invalid endpoint '{}': {}", config.endpoint, e))
        })?;
        Self::new(
            endpoint,
            Duration::from_secs(config.timeout_secs),
            config.api_key.as_deref(),
        )
    }

    fn document_url(&self, id: &str) -> StoreResult<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidRequest(format!("endpoint '{}' cannot be a base", self.endpoint)))?
            .pop_if_empty()
            .push("docs")
            .push(id);
        Ok(url)
    }

    fn map_error(&self, err: reqwest::Error) -> StoreError {
        if err.is_timeout() {
            StoreError::Timeout(self.timeout_secs)
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn read_document(
        &self,
        id: &str,
        partition: &PartitionKey,
        if_none_match: Option<&str>,
    ) -> StoreResult<ReadOutcome> {
        let url = self.document_url(id)?;
        let mut request = self
            .client
            .get(url)
            .header(PARTITION_HEADER, partition.header_value());
        if let Some(etag) = if_none_match {
            request = request.header(IF_NONE_MATCH, etag);
        }

        let response = request.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status();

        match status {
            StatusCode::NOT_MODIFIED => Ok(ReadOutcome::NotModified),
            StatusCode::NOT_FOUND => Ok(ReadOutcome::NotFound),
            s if s.is_success() => {
                let etag = response
                    .headers()
                    .get(ETAG)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                if etag.is_empty() {
                    tracing::warn!(document_id = %id, "Document store returned no ETag");
                }
                let content = response.bytes().await.map_err(|e| self.map_error(e))?;
                Ok(ReadOutcome::Found { content, etag })
            }
            other => Err(StoreError::Status(other.as_u16())),
        }
    }
}
