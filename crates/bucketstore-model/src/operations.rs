//! Bucket Store operation enum.

use std::fmt;

/// All operations exposed by the Bucket Store HTTP API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketStoreOperation {
    /// Liveness probe.
    Ping,

    // Buckets
    /// List all buckets with their resolved regions.
    ListBuckets,
    /// Create a bucket in a given region.
    CreateBucket,
    /// Drain and delete a bucket.
    DeleteBucket,

    // Documents
    /// List one page of objects in a bucket.
    ListDocuments,
    /// Bulk-delete objects from a bucket.
    DeleteDocuments,
    /// Generate a presigned upload URL.
    GetUploadUrl,

    // Settings
    /// Summarize stored AWS settings.
    GetSettings,
    /// Store the AWS access key id.
    SetAccessKey,
    /// Remove the stored AWS access key id.
    ClearAccessKey,
    /// Store the AWS secret access key.
    SetSecretKey,
    /// Remove the stored AWS secret access key.
    ClearSecretKey,
    /// Store the preferred region.
    SetRegion,
    /// Read the preferred region.
    GetRegion,
}

impl BucketStoreOperation {
    /// Returns the operation name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ping => "Ping",
            Self::ListBuckets => "ListBuckets",
            Self::CreateBucket => "CreateBucket",
            Self::DeleteBucket => "DeleteBucket",
            Self::ListDocuments => "ListDocuments",
            Self::DeleteDocuments => "DeleteDocuments",
            Self::GetUploadUrl => "GetUploadUrl",
            Self::GetSettings => "GetSettings",
            Self::SetAccessKey => "SetAccessKey",
            Self::ClearAccessKey => "ClearAccessKey",
            Self::SetSecretKey => "SetSecretKey",
            Self::ClearSecretKey => "ClearSecretKey",
            Self::SetRegion => "SetRegion",
            Self::GetRegion => "GetRegion",
        }
    }

    /// Whether the operation changes stored credentials.
    #[must_use]
    pub fn mutates_credentials(&self) -> bool {
        matches!(
            self,
            Self::SetAccessKey | Self::ClearAccessKey | Self::SetSecretKey | Self::ClearSecretKey
        )
    }
}

impl fmt::Display for BucketStoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
