//! Bucket Store configuration.
//!
//! Provides [`BucketStoreConfig`]. Values are loaded from environment
//! variables with defaults matching the behavior of the hosted service.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Longest lifetime SigV4 accepts for a presigned URL (seven days).
pub const MAX_UPLOAD_URL_EXPIRY_SECS: u64 = 7 * 24 * 60 * 60;

/// Server configuration.
///
/// # Examples
///
/// ```
/// use bucketstore_core::config::BucketStoreConfig;
///
/// let config = BucketStoreConfig::default();
/// assert_eq!(config.gateway_listen, "0.0.0.0:8080");
/// assert_eq!(config.documents_page_size, 20);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct BucketStoreConfig {
    /// Bind address (e.g. `"0.0.0.0:8080"`).
    #[builder(default = String::from("0.0.0.0:8080"))]
    pub gateway_listen: String,

    /// Region of the registry's `default` client. Bucket listing goes
    /// through this client.
    #[builder(default = String::from("us-east-1"))]
    pub default_region: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,

    /// Path of the JSON file holding persisted AWS settings.
    #[builder(default = String::from("./data/settings.json"))]
    pub settings_path: String,

    /// Objects returned per `GET /buckets/documents` page.
    #[builder(default = 20)]
    pub documents_page_size: i32,

    /// Lifetime of presigned upload URLs, in seconds. Between 1 and
    /// [`MAX_UPLOAD_URL_EXPIRY_SECS`].
    #[builder(default = 3600)]
    pub upload_url_expiry_secs: u64,

    /// Override for the S3 endpoint (S3-compatible emulators).
    #[builder(default)]
    pub s3_endpoint_url: Option<String>,

    /// Use path-style bucket addressing.
    #[builder(default = false)]
    pub s3_force_path_style: bool,
}

impl Default for BucketStoreConfig {
    fn default() -> Self {
        Self {
            gateway_listen: String::from("0.0.0.0:8080"),
            default_region: String::from("us-east-1"),
            log_level: String::from("info"),
            settings_path: String::from("./data/settings.json"),
            documents_page_size: 20,
            upload_url_expiry_secs: 3600,
            s3_endpoint_url: None,
            s3_force_path_style: false,
        }
    }
}

impl BucketStoreConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `GATEWAY_LISTEN` | `0.0.0.0:8080` |
    /// | `DEFAULT_REGION` | `us-east-1` |
    /// | `LOG_LEVEL` | `info` |
    /// | `SETTINGS_PATH` | `./data/settings.json` |
    /// | `DOCUMENTS_PAGE_SIZE` | `20` |
    /// | `UPLOAD_URL_EXPIRY_SECS` | `3600` |
    /// | `S3_ENDPOINT_URL` | *(unset)* |
    /// | `S3_FORCE_PATH_STYLE` | `false` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Ok(v) = std::env::var("DEFAULT_REGION") {
            if !v.is_empty() {
                config.default_region = v;
            }
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Ok(v) = std::env::var("SETTINGS_PATH") {
            config.settings_path = v;
        }
        if let Ok(v) = std::env::var("DOCUMENTS_PAGE_SIZE") {
            if let Ok(n) = v.parse::<i32>() {
                if n > 0 {
                    config.documents_page_size = n;
                }
            }
        }
        if let Ok(v) = std::env::var("UPLOAD_URL_EXPIRY_SECS") {
            if let Some(n) = parse_upload_url_expiry(&v) {
                config.upload_url_expiry_secs = n;
            }
        }
        if let Ok(v) = std::env::var("S3_ENDPOINT_URL") {
            if !v.is_empty() {
                config.s3_endpoint_url = Some(v);
            }
        }
        if let Ok(v) = std::env::var("S3_FORCE_PATH_STYLE") {
            config.s3_force_path_style = parse_bool(&v);
        }

        config
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Parse a presigned URL lifetime, rejecting values SigV4 would refuse.
fn parse_upload_url_expiry(value: &str) -> Option<u64> {
    value
        .parse::<u64>()
        .ok()
        .filter(|n| (1..=MAX_UPLOAD_URL_EXPIRY_SECS).contains(n))
}
