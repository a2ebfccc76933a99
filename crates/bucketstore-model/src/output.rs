//! Bucket Store output types.
//!
//! Field names follow the JSON API exactly: snake_case for bucket and
//! document fields, and the literal `"continuation-token"` key for the
//! listing cursor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Buckets
// ---------------------------------------------------------------------------

/// A bucket together with its resolved region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketEntry {
    /// Bucket name.
    pub name: String,
    /// Creation time reported by the storage service.
    pub created_at: Option<DateTime<Utc>>,
    /// Region the bucket lives in.
    pub region: String,
}

/// Output for `GET /buckets`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListBucketsOutput {
    /// All buckets visible to the configured credentials.
    pub buckets: Vec<BucketEntry>,
}

/// Output for `POST /buckets` (status `201`).
pub type CreateBucketOutput = BucketEntry;

/// Output for `DELETE /buckets`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DeleteBucketOutput {
    /// Whether the bucket was deleted.
    pub deleted: bool,
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// An object in a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    /// Object key.
    pub name: String,
    /// Last modification time.
    pub last_modified: Option<DateTime<Utc>>,
    /// Size in bytes.
    pub size: Option<i64>,
}

/// Output for `GET /buckets/documents`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListDocumentsOutput {
    /// One page of objects.
    pub documents: Vec<DocumentEntry>,
    /// Cursor for the next page, `null` on the last page.
    #[serde(rename = "continuation-token")]
    pub continuation_token: Option<String>,
}

/// Output for `GET /buckets/upload-url`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetUploadUrlOutput {
    /// Presigned PUT URL.
    pub url: String,
}

/// Output for `DELETE /buckets/documents`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteDocumentsOutput {
    /// Whether every requested key was deleted.
    pub deleted: bool,
    /// Number of keys deleted.
    pub count: usize,
    /// Number of keys the storage service refused to delete.
    pub failed: usize,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Output for `POST /settings/aws/key` (status `201`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetAccessKeyOutput {
    /// The stored access key id.
    pub key: String,
}

/// Output for `POST /settings/aws/secret` (status `201`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetSecretKeyOutput {
    /// The stored secret, masked to its last four characters.
    pub secret: String,
}

/// Output for `POST /settings/aws/region` (status `201`) and
/// `GET /settings/aws/region`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionOutput {
    /// The stored region, if any.
    pub region: Option<String>,
}

/// Output for `DELETE /settings/aws/{key|secret}`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ClearCredentialOutput {
    /// Whether a value was stored before the delete.
    pub cleared: bool,
}

/// Output for `GET /settings`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsOutput {
    /// AWS section.
    pub aws: AwsSettingsSummary,
}

/// Summary of the stored AWS settings. Secrets are never echoed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwsSettingsSummary {
    /// Stored preferred region.
    pub region: Option<String>,
    /// Whether an access key id is stored.
    pub key_configured: bool,
    /// Whether a secret access key is stored.
    pub secret_configured: bool,
    /// Whether the client registry currently holds usable clients.
    pub initialized: bool,
}

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

/// Output for `GET /ping`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingOutput {
    /// Always `"pong"`.
    pub message: String,
    /// Server time.
    pub time: DateTime<Utc>,
}
