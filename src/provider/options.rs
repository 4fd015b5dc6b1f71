//! Provider construction options.

use std::sync::Arc;

use crate::config::DocumentConfig;
use crate::error::ArgumentError;
use crate::flatten::DEFAULT_DELIMITER;
use crate::provider::picker::SubKeyPicker;
use crate::store::{DocumentStore, PartitionKey};

/// Validated options for a [`DocumentConfigProvider`](crate::provider::DocumentConfigProvider).
#[derive(Clone)]
pub struct ProviderOptions {
    pub(crate) store: Arc<dyn DocumentStore>,
    pub(crate) document_id: String,
    pub(crate) partition_key: PartitionKey,
    pub(crate) picker: SubKeyPicker,
    pub(crate) delimiter: String,
}

impl ProviderOptions {
    pub fn builder() -> ProviderOptionsBuilder {
        ProviderOptionsBuilder::default()
    }

    /// Options for the document described by a `[document]` settings section.
    pub fn from_config(
        store: Arc<dyn DocumentStore>,
        config: &DocumentConfig,
    ) -> Result<Self, ArgumentError> {
        let mut builder = Self::builder()
            .store(store)
            .document_id(config.id.clone())
            .partition_key(config.partition_key.clone())
            .delimiter(config.delimiter.clone());
        if let Some(path) = &config.sub_key {
            builder = builder.sub_key_picker(SubKeyPicker::path(path));
        }
        builder.build()
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn partition_key(&self) -> &PartitionKey {
        &self.partition_key
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn picker(&self) -> &SubKeyPicker {
        &self.picker
    }
}

/// Builder for [`ProviderOptions`]. Nothing touches the network until the
/// provider is reloaded.
#[derive(Default)]
pub struct ProviderOptionsBuilder {
    store: Option<Arc<dyn DocumentStore>>,
    document_id: Option<String>,
    partition_key: PartitionKey,
    picker: Option<SubKeyPicker>,
    delimiter: Option<String>,
}

impl ProviderOptionsBuilder {
    /// Store the document is read from. Required.
    pub fn store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Document to read. Required.
    pub fn document_id(mut self, id: impl Into<String>) -> Self {
        self.document_id = Some(id.into());
        self
    }

    /// Partition to read from; `None` selects the null partition.
    pub fn partition_key(mut self, key: impl Into<PartitionKey>) -> Self {
        self.partition_key = key.into();
        self
    }

    /// Sub-tree of the document to expose. Defaults to the whole document.
    pub fn sub_key_picker(mut self, picker: SubKeyPicker) -> Self {
        self.picker = Some(picker);
        self
    }

    /// Key segment separator. Defaults to `:`.
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    pub fn build(self) -> Result<ProviderOptions, ArgumentError> {
        let store = self.store.ok_or(ArgumentError::Missing("store"))?;
        let document_id = self.document_id.ok_or(ArgumentError::Missing("document_id"))?;
        if document_id.trim().is_empty() {
            return Err(ArgumentError::Empty("document_id"));
        }
        let delimiter = self
            .delimiter
            .unwrap_or_else(|| DEFAULT_DELIMITER.to_string());
        if delimiter.is_empty() {
            return Err(ArgumentError::Empty("delimiter"));
        }

        Ok(ProviderOptions {
            store,
            document_id,
            partition_key: self.partition_key,
            picker: self.picker.unwrap_or_default(),
            delimiter,
        })
    }
}
