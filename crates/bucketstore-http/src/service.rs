//! Bucket Store HTTP service implementing the hyper `Service` trait.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::{BodyExt, Limited};
use hyper::body::Incoming;

use bucketstore_model::error::BucketStoreError;

use crate::body::BucketStoreResponseBody;
use crate::dispatch::{BucketStoreHandler, dispatch_operation};
use crate::request::{ApiRequest, QueryParams};
use crate::response::{CONTENT_TYPE, REQUEST_ID_HEADER, error_to_response, preflight_response};
use crate::router::resolve_operation;

/// Configuration for the HTTP service.
#[derive(Debug, Clone)]
pub struct BucketStoreHttpConfig {
    /// Largest accepted request body in bytes.
    pub max_body_bytes: usize,
    /// Value of `access-control-allow-origin`.
    pub cors_allow_origin: String,
}

impl Default for BucketStoreHttpConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 48 * 1024 * 1024,
            cors_allow_origin: "*".to_owned(),
        }
    }
}

/// Hyper `Service` for the Bucket Store API.
///
/// Wraps a [`BucketStoreHandler`] and routes incoming HTTP requests to it.
#[derive(Debug)]
pub struct BucketStoreHttpService<H: BucketStoreHandler> {
    handler: Arc<H>,
    config: Arc<BucketStoreHttpConfig>,
}

impl<H: BucketStoreHandler> BucketStoreHttpService<H> {
    /// Create a new service.
    pub fn new(handler: Arc<H>, config: BucketStoreHttpConfig) -> Self {
        Self {
            handler,
            config: Arc::new(config),
        }
    }
}

impl<H: BucketStoreHandler> Clone for BucketStoreHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            config: Arc::clone(&self.config),
        }
    }
}

impl<H: BucketStoreHandler> hyper::service::Service<http::Request<Incoming>>
    for BucketStoreHttpService<H>
{
    type Response = http::Response<BucketStoreResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let config = Arc::clone(&self.config);
        let request_id = uuid::Uuid::new_v4().to_string();

        Box::pin(async move {
            let response = process_request(req, handler.as_ref(), &config, &request_id).await;
            Ok(add_common_headers(response, &config, &request_id))
        })
    }
}

/// Process a single request through the full pipeline.
pub async fn process_request<B, H>(
    req: http::Request<B>,
    handler: &H,
    config: &BucketStoreHttpConfig,
    request_id: &str,
) -> http::Response<BucketStoreResponseBody>
where
    B: http_body::Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    H: BucketStoreHandler,
{
    let started = Instant::now();
    let (parts, incoming) = req.into_parts();

    // 1. CORS preflight.
    if parts.method == http::Method::OPTIONS {
        return preflight_response(request_id);
    }

    // 2. Route.
    let op = match resolve_operation(&parts.method, parts.uri.path()) {
        Ok(op) => op,
        Err(err) => return error_to_response(&err, request_id),
    };

    // 3. Decode query and collect body.
    let query = QueryParams::parse(parts.uri.query());
    let body = match collect_body(incoming, config.max_body_bytes).await {
        Ok(body) => body,
        Err(err) => return error_to_response(&err, request_id),
    };

    // 4. Dispatch.
    let request = ApiRequest::new(query, body).with_request_id(request_id);
    let response = match dispatch_operation(handler, op, request).await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(
                operation = %op,
                request_id,
                code = %err.code,
                error = %err.summary,
                message = %err.message,
                "operation failed",
            );
            error_to_response(&err, request_id)
        }
    };

    tracing::info!(
        operation = %op,
        request_id,
        status = response.status().as_u16(),
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "request completed",
    );

    response
}

/// Collect the body into a single buffer, enforcing the size limit.
async fn collect_body<B>(incoming: B, limit: usize) -> Result<Bytes, BucketStoreError>
where
    B: http_body::Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    Limited::new(incoming, limit)
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|e| BucketStoreError::validation(format!("failed to read request body: {e}")))
}

/// Add headers every response carries.
fn add_common_headers(
    mut response: http::Response<BucketStoreResponseBody>,
    config: &BucketStoreHttpConfig,
    request_id: &str,
) -> http::Response<BucketStoreResponseBody> {
    let is_empty = matches!(response.body(), BucketStoreResponseBody::Empty);
    let headers = response.headers_mut();

    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        headers.insert(REQUEST_ID_HEADER, hv);
    }

    if !is_empty {
        headers
            .entry("content-type")
            .or_insert(http::HeaderValue::from_static(CONTENT_TYPE));
    }

    headers.insert("server", http::HeaderValue::from_static("BucketStore"));

    if let Ok(hv) = http::HeaderValue::from_str(&config.cors_allow_origin) {
        headers.insert("access-control-allow-origin", hv);
    }

    response
}
