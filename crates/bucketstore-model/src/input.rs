//! Bucket Store input types.
//!
//! Required fields are still `Option` here: presence is checked by the
//! provider so that a missing field becomes a `400` naming that field rather
//! than a generic deserialization failure.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Buckets
// ---------------------------------------------------------------------------

/// Input for `POST /buckets` (JSON body).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBucketInput {
    /// Bucket name.
    #[serde(default)]
    pub name: Option<String>,
    /// Region to create the bucket in.
    #[serde(default)]
    pub region: Option<String>,
}

/// Input for `DELETE /buckets?name=`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteBucketInput {
    /// Bucket name.
    #[serde(default)]
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// Input for `GET /buckets/documents?bucket=&continuationToken=`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsInput {
    /// Bucket name.
    #[serde(default)]
    pub bucket: Option<String>,
    /// Cursor returned by the previous page.
    #[serde(default)]
    pub continuation_token: Option<String>,
}

/// Input for `GET /buckets/upload-url?bucket=&filename=`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetUploadUrlInput {
    /// Bucket name.
    #[serde(default)]
    pub bucket: Option<String>,
    /// Object key the URL will upload to.
    #[serde(default)]
    pub filename: Option<String>,
}

/// Input for `DELETE /buckets/documents?bucket=&filenames[]=...`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteDocumentsInput {
    /// Bucket name.
    #[serde(default)]
    pub bucket: Option<String>,
    /// Object keys to delete.
    #[serde(default)]
    pub filenames: Vec<String>,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Input for `POST /settings/aws/key`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetAccessKeyInput {
    /// AWS access key id.
    #[serde(default)]
    pub key: Option<String>,
}

/// Input for `POST /settings/aws/secret`.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SetSecretKeyInput {
    /// AWS secret access key.
    #[serde(default)]
    pub secret: Option<String>,
}

impl std::fmt::Debug for SetSecretKeyInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetSecretKeyInput")
            .field("secret", &self.secret.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Input for `POST /settings/aws/region`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetRegionInput {
    /// Preferred region.
    #[serde(default)]
    pub region: Option<String>,
}
