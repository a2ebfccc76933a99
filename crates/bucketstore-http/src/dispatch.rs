//! Handler trait and operation dispatch.

use std::future::Future;
use std::pin::Pin;

use bucketstore_model::BucketStoreOperation;
use bucketstore_model::error::BucketStoreError;

use crate::body::BucketStoreResponseBody;
use crate::request::ApiRequest;

/// Boxed future returned by [`BucketStoreHandler::handle_operation`].
pub type HandlerFuture = Pin<
    Box<dyn Future<Output = Result<http::Response<BucketStoreResponseBody>, BucketStoreError>> + Send>,
>;

/// Trait implemented by the business logic behind the HTTP layer.
///
/// The handler receives the resolved operation plus the decoded query string
/// and raw body, and returns a complete HTTP response.
pub trait BucketStoreHandler: Send + Sync + 'static {
    /// Handle an operation and produce an HTTP response.
    fn handle_operation(&self, op: BucketStoreOperation, request: ApiRequest) -> HandlerFuture;
}

/// Dispatch an operation to the handler.
pub async fn dispatch_operation<H: BucketStoreHandler>(
    handler: &H,
    op: BucketStoreOperation,
    request: ApiRequest,
) -> Result<http::Response<BucketStoreResponseBody>, BucketStoreError> {
    tracing::debug!(operation = %op, "dispatching operation");
    handler.handle_operation(op, request).await
}
