//! Bucket Store request router.
//!
//! Routing is a fixed table of `(method, path)` pairs. The server historically
//! lived under `/api`, so that prefix is stripped before matching:
//!
//! ```text
//! GET /api/buckets/documents?bucket=photos  ->  ListDocuments
//! GET /buckets/documents?bucket=photos      ->  ListDocuments
//! ```

use bucketstore_model::BucketStoreOperation;
use bucketstore_model::error::BucketStoreError;

/// Optional mount prefix accepted in front of every route.
const API_PREFIX: &str = "/api";

/// Resolve the operation for a method and path.
///
/// Trailing slashes are ignored. A known path with an unsupported method is
/// reported the same way as an unknown path.
pub fn resolve_operation(
    method: &http::Method,
    path: &str,
) -> Result<BucketStoreOperation, BucketStoreError> {
    let normalized = normalize_path(path);

    let op = match (method, normalized) {
        (&http::Method::GET, "/ping") => BucketStoreOperation::Ping,

        (&http::Method::GET, "/buckets") => BucketStoreOperation::ListBuckets,
        (&http::Method::POST, "/buckets") => BucketStoreOperation::CreateBucket,
        (&http::Method::DELETE, "/buckets") => BucketStoreOperation::DeleteBucket,

        (&http::Method::GET, "/buckets/documents") => BucketStoreOperation::ListDocuments,
        (&http::Method::DELETE, "/buckets/documents") => BucketStoreOperation::DeleteDocuments,
        (&http::Method::GET, "/buckets/upload-url") => BucketStoreOperation::GetUploadUrl,

        (&http::Method::GET, "/settings") => BucketStoreOperation::GetSettings,
        (&http::Method::POST, "/settings/aws/key") => BucketStoreOperation::SetAccessKey,
        (&http::Method::DELETE, "/settings/aws/key") => BucketStoreOperation::ClearAccessKey,
        (&http::Method::POST, "/settings/aws/secret") => BucketStoreOperation::SetSecretKey,
        (&http::Method::DELETE, "/settings/aws/secret") => BucketStoreOperation::ClearSecretKey,
        (&http::Method::POST, "/settings/aws/region") => BucketStoreOperation::SetRegion,
        (&http::Method::GET, "/settings/aws/region") => BucketStoreOperation::GetRegion,

        _ => return Err(BucketStoreError::route_not_found(method, path)),
    };

    Ok(op)
}

/// Strip the optional `/api` prefix and any trailing slash.
fn normalize_path(path: &str) -> &str {
    let path = match path.strip_prefix(API_PREFIX) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    };
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}
