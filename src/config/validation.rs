//! Settings validation.
//!
//! Collects every problem instead of stopping at the first one.

use std::fmt;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::Settings;

/// A single semantic problem in the settings file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check the settings for values serde cannot reject on its own.
pub fn validate_settings(settings: &Settings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.document.id.trim().is_empty() {
        errors.push(ValidationError::new("document.id", "must not be empty"));
    }
    if settings.document.delimiter.is_empty() {
        errors.push(ValidationError::new("document.delimiter", "must not be empty"));
    }
    if let Some(sub_key) = &settings.document.sub_key {
        if sub_key.split('.').any(str::is_empty) {
            errors.push(ValidationError::new(
                "document.sub_key",
                format!("'{}' contains an empty segment", sub_key),
            ));
        }
    }

    match Url::parse(&settings.store.endpoint) {
        Ok(url) if url.cannot_be_a_base() => {
            errors.push(ValidationError::new("store.endpoint", "must be a base URL"));
        }
        Ok(_) => {}
        Err(e) => {
            errors.push(ValidationError::new("store.endpoint", e.to_string()));
        }
    }
    if settings.store.timeout_secs == 0 {
        errors.push(ValidationError::new("store.timeout_secs", "must be greater than 0"));
    }

    if settings.refresh.enabled && settings.refresh.interval_secs == 0 {
        errors.push(ValidationError::new("refresh.interval_secs", "must be greater than 0"));
    }

    if settings.observability.metrics_enabled
        && settings.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", settings.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
