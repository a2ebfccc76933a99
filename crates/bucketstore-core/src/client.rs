//! The storage client seam.
//!
//! The registry and provider only ever talk to S3 through [`StorageClient`],
//! and only ever build clients through [`ClientFactory`]. The production
//! implementation lives in [`crate::aws`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::credentials::AccessKeyPair;
use crate::error::StorageError;
use crate::types::AwsRegion;

/// A bucket as returned by `ListBuckets`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSummary {
    /// Bucket name.
    pub name: String,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
}

/// An object as returned by `ListObjectsV2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    /// Object key.
    pub key: String,
    /// Last modification time.
    pub last_modified: Option<DateTime<Utc>>,
    /// Size in bytes.
    pub size: Option<i64>,
}

/// One page of a `ListObjectsV2` listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectPage {
    /// Objects on this page.
    pub objects: Vec<ObjectSummary>,
    /// Whether more pages follow.
    pub is_truncated: bool,
    /// Cursor for the next page.
    pub next_continuation_token: Option<String>,
}

/// Outcome of a bulk delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteObjectsResult {
    /// Keys the service confirmed deleted.
    pub deleted: Vec<String>,
    /// Keys the service refused, with its message.
    pub failed: Vec<(String, String)>,
}

/// A storage client bound to exactly one region.
#[async_trait]
pub trait StorageClient: Send + Sync + fmt::Debug {
    /// The region this client is pinned to.
    fn region(&self) -> &AwsRegion;

    /// List every bucket owned by the credentials.
    async fn list_buckets(&self) -> Result<Vec<BucketSummary>, StorageError>;

    /// Raw location constraint of a bucket (`None` for `us-east-1`).
    async fn get_bucket_location(&self, bucket: &str) -> Result<Option<String>, StorageError>;

    /// Create a bucket in this client's region.
    async fn create_bucket(&self, bucket: &str) -> Result<(), StorageError>;

    /// Delete an empty bucket.
    async fn delete_bucket(&self, bucket: &str) -> Result<(), StorageError>;

    /// List one page of objects.
    async fn list_objects(
        &self,
        bucket: &str,
        continuation_token: Option<&str>,
        max_keys: Option<i32>,
    ) -> Result<ObjectPage, StorageError>;

    /// Delete up to 1000 keys in one call.
    async fn delete_objects(
        &self,
        bucket: &str,
        keys: &[String],
    ) -> Result<DeleteObjectsResult, StorageError>;

    /// Presign a `PutObject` request.
    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError>;
}

/// Builds region-pinned clients from a credential pair.
///
/// Construction is local (no network I/O) and cannot fail; bad credentials
/// surface on first use of the client.
pub trait ClientFactory: Send + Sync + fmt::Debug {
    /// Build a client for `region`.
    fn build(&self, region: &AwsRegion, credentials: &AccessKeyPair) -> Arc<dyn StorageClient>;
}
