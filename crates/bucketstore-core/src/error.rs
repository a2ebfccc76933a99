//! Error types below the provider boundary.
//!
//! [`StorageError`] and [`SettingsError`] are converted into the API's
//! [`BucketStoreError`] by the provider, which adds the step summary
//! (`"could not list objects"`, ...).

use bucketstore_model::error::BucketStoreError;

/// A failed storage service call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct StorageError {
    /// Service error code (e.g. `NoSuchBucket`), when the service sent one.
    pub code: Option<String>,
    /// The service's message, verbatim.
    pub message: String,
}

impl StorageError {
    /// Create an error from a code and message.
    #[must_use]
    pub fn new(code: Option<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Convert into an upstream API error for the step described by `summary`.
    #[must_use]
    pub fn into_api_error(self, summary: &str) -> BucketStoreError {
        BucketStoreError::upstream(summary, self.message.clone()).with_source(self)
    }
}

/// Failure of the settings store.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Reading or writing the settings file failed.
    #[error("settings i/o error on {path}: {source}")]
    Io {
        /// File involved.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON.
    #[error("invalid settings document: {0}")]
    Json(#[from] serde_json::Error),
}

impl SettingsError {
    /// Convert into a persistence API error for the step described by `summary`.
    #[must_use]
    pub fn into_api_error(self, summary: &str) -> BucketStoreError {
        BucketStoreError::persistence(summary, self.to_string()).with_source(self)
    }
}
