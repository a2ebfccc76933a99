//! Bucket Store error types.
//!
//! Every error response carries a JSON body of the form
//!
//! ```json
//! { "error": "could not fetch buckets", "message": "The AWS Access Key Id you provided does not exist" }
//! ```
//!
//! where `error` is a short summary of the failed step and `message` is the
//! detail (for upstream failures, the storage service's message verbatim).

use std::fmt;

use serde_json::{Map, Value};

/// Error categories of the Bucket Store API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum BucketStoreErrorCode {
    /// A required request field is missing or malformed.
    #[default]
    ValidationError,
    /// No usable storage client: credentials have not been supplied.
    NotInitialized,
    /// Unknown route.
    NotFound,
    /// The storage service rejected or failed the call.
    UpstreamError,
    /// Settings could not be read or written.
    PersistenceError,
    /// Anything else.
    InternalError,
}

impl BucketStoreErrorCode {
    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "ValidationError",
            Self::NotInitialized => "NotInitialized",
            Self::NotFound => "NotFound",
            Self::UpstreamError => "UpstreamError",
            Self::PersistenceError => "PersistenceError",
            Self::InternalError => "InternalError",
        }
    }

    /// Summary used for the `error` field when none is given.
    #[must_use]
    pub fn default_summary(&self) -> &'static str {
        match self {
            Self::ValidationError => "bad request",
            Self::NotInitialized => "not initialized",
            Self::NotFound => "not found",
            Self::UpstreamError => "upstream error",
            Self::PersistenceError => "could not persist settings",
            Self::InternalError => "internal error",
        }
    }

    /// Returns the default HTTP status code for this error.
    #[must_use]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::ValidationError => http::StatusCode::BAD_REQUEST,
            Self::NotFound => http::StatusCode::NOT_FOUND,
            Self::NotInitialized
            | Self::UpstreamError
            | Self::PersistenceError
            | Self::InternalError => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for BucketStoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Bucket Store error response.
#[derive(Debug)]
pub struct BucketStoreError {
    /// The error category.
    pub code: BucketStoreErrorCode,
    /// Short summary of the step that failed.
    pub summary: String,
    /// A human-readable error message.
    pub message: String,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
    /// Extra top-level fields merged into the JSON body.
    pub extra: Map<String, Value>,
    /// The underlying source error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for BucketStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BucketStoreError({}): {}: {}",
            self.code, self.summary, self.message
        )
    }
}

impl std::error::Error for BucketStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl BucketStoreError {
    /// Create a new error with a summary and message.
    #[must_use]
    pub fn new(
        code: BucketStoreErrorCode,
        summary: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status_code: code.default_status_code(),
            summary: summary.into(),
            message: message.into(),
            code,
            extra: Map::new(),
            source: None,
        }
    }

    /// Create a new error using the code's default summary.
    #[must_use]
    pub fn with_message(code: BucketStoreErrorCode, message: impl Into<String>) -> Self {
        Self::new(code, code.default_summary(), message)
    }

    /// Set the source error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Add an extra top-level field to the JSON body.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Render the JSON body for this error.
    #[must_use]
    pub fn to_json_value(&self) -> Value {
        let mut body = Map::new();
        body.insert("error".to_owned(), Value::String(self.summary.clone()));
        body.insert("message".to_owned(), Value::String(self.message.clone()));
        for (name, value) in &self.extra {
            body.insert(name.clone(), value.clone());
        }
        Value::Object(body)
    }

    // -- Convenience constructors --

    /// A required request field is absent.
    #[must_use]
    pub fn missing_field(field: &str) -> Self {
        Self::with_message(
            BucketStoreErrorCode::ValidationError,
            format!("{field} is required"),
        )
    }

    /// Validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_message(BucketStoreErrorCode::ValidationError, message)
    }

    /// No storage client available for the requested region.
    #[must_use]
    pub fn not_initialized() -> Self {
        Self::with_message(
            BucketStoreErrorCode::NotInitialized,
            "s3 not initialized properly",
        )
    }

    /// Unknown route.
    #[must_use]
    pub fn route_not_found(method: &http::Method, path: &str) -> Self {
        Self::with_message(
            BucketStoreErrorCode::NotFound,
            format!("no route for {method} {path}"),
        )
    }

    /// Storage service failure, message passed through verbatim.
    #[must_use]
    pub fn upstream(summary: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(BucketStoreErrorCode::UpstreamError, summary, message)
    }

    /// Settings persistence failure.
    #[must_use]
    pub fn persistence(summary: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(BucketStoreErrorCode::PersistenceError, summary, message)
    }

    /// Internal server error.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::with_message(BucketStoreErrorCode::InternalError, message)
    }
}
