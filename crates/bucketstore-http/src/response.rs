//! JSON response serialization and error formatting.

use bucketstore_model::error::BucketStoreError;

use crate::body::BucketStoreResponseBody;

/// Content type of every response with a body.
pub const CONTENT_TYPE: &str = "application/json";

/// Header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Serialize a `BucketStoreError` into its JSON body.
///
/// ```json
/// { "error": "could not delete bucket", "message": "Access Denied", "deleted": false }
/// ```
#[must_use]
pub fn error_to_json(error: &BucketStoreError) -> Vec<u8> {
    serde_json::to_vec(&error.to_json_value()).unwrap_or_default()
}

/// Convert a `BucketStoreError` into a complete HTTP error response.
#[must_use]
pub fn error_to_response(
    error: &BucketStoreError,
    request_id: &str,
) -> http::Response<BucketStoreResponseBody> {
    let body = BucketStoreResponseBody::from_json(error_to_json(error));

    http::Response::builder()
        .status(error.status_code)
        .header("content-type", CONTENT_TYPE)
        .header(REQUEST_ID_HEADER, request_id)
        .body(body)
        .expect("valid error response")
}

/// Build a success response from JSON bytes.
#[must_use]
pub fn json_response(
    status: http::StatusCode,
    json: Vec<u8>,
    request_id: &str,
) -> http::Response<BucketStoreResponseBody> {
    http::Response::builder()
        .status(status)
        .header("content-type", CONTENT_TYPE)
        .header(REQUEST_ID_HEADER, request_id)
        .body(BucketStoreResponseBody::from_json(json))
        .expect("valid JSON response")
}

/// Answer a CORS preflight request.
#[must_use]
pub fn preflight_response(request_id: &str) -> http::Response<BucketStoreResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::NO_CONTENT)
        .header("access-control-allow-methods", "GET, POST, DELETE, OPTIONS")
        .header("access-control-allow-headers", "content-type, authorization")
        .header("access-control-max-age", "86400")
        .header(REQUEST_ID_HEADER, request_id)
        .body(BucketStoreResponseBody::empty())
        .expect("valid preflight response")
}
