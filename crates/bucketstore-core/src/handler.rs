//! Handler bridging the HTTP layer to the [`BucketStore`] provider.

use std::sync::Arc;

use bucketstore_http::body::BucketStoreResponseBody;
use bucketstore_http::dispatch::{BucketStoreHandler, HandlerFuture};
use bucketstore_http::request::ApiRequest;
use bucketstore_http::response::json_response;
use bucketstore_model::error::BucketStoreError;
use bucketstore_model::input::{
    CreateBucketInput, DeleteBucketInput, DeleteDocumentsInput, GetUploadUrlInput,
    ListDocumentsInput, SetAccessKeyInput, SetRegionInput, SetSecretKeyInput,
};
use bucketstore_model::operations::BucketStoreOperation;
use http::StatusCode;

use crate::provider::BucketStore;

/// Handler that bridges the HTTP layer to the Bucket Store provider.
#[derive(Debug)]
pub struct BucketStoreApiHandler {
    provider: Arc<BucketStore>,
}

impl BucketStoreApiHandler {
    /// Create a new handler wrapping a provider.
    #[must_use]
    pub fn new(provider: Arc<BucketStore>) -> Self {
        Self { provider }
    }
}

impl BucketStoreHandler for BucketStoreApiHandler {
    fn handle_operation(&self, op: BucketStoreOperation, request: ApiRequest) -> HandlerFuture {
        let provider = Arc::clone(&self.provider);
        Box::pin(async move { dispatch(provider.as_ref(), op, &request).await })
    }
}

/// Dispatch an operation to the matching provider method.
async fn dispatch(
    provider: &BucketStore,
    op: BucketStoreOperation,
    request: &ApiRequest,
) -> Result<http::Response<BucketStoreResponseBody>, BucketStoreError> {
    let request_id = request.request_id.as_str();
    let query = &request.query;

    match op {
        BucketStoreOperation::Ping => serialize(StatusCode::OK, &provider.handle_ping(), request_id),
        BucketStoreOperation::ListBuckets => {
            let output = provider.handle_list_buckets().await?;
            serialize(StatusCode::OK, &output, request_id)
        }
        BucketStoreOperation::CreateBucket => {
            let input: CreateBucketInput = request.json_body()?;
            let output = provider.handle_create_bucket(input).await?;
            serialize(StatusCode::CREATED, &output, request_id)
        }
        BucketStoreOperation::DeleteBucket => {
            let input = DeleteBucketInput {
                name: query.get_owned("name"),
            };
            let output = provider.handle_delete_bucket(input).await?;
            serialize(StatusCode::OK, &output, request_id)
        }
        BucketStoreOperation::ListDocuments => {
            let input = ListDocumentsInput {
                bucket: query.get_owned("bucket"),
                continuation_token: query.get_owned("continuationToken"),
            };
            let output = provider.handle_list_documents(input).await?;
            serialize(StatusCode::OK, &output, request_id)
        }
        BucketStoreOperation::DeleteDocuments => {
            let input = DeleteDocumentsInput {
                bucket: query.get_owned("bucket"),
                filenames: query.get_all(&["filenames[]", "filenames"]),
            };
            let output = provider.handle_delete_documents(input).await?;
            serialize(StatusCode::OK, &output, request_id)
        }
        BucketStoreOperation::GetUploadUrl => {
            let input = GetUploadUrlInput {
                bucket: query.get_owned("bucket"),
                filename: query.get_owned("filename"),
            };
            let output = provider.handle_get_upload_url(input).await?;
            serialize(StatusCode::OK, &output, request_id)
        }
        BucketStoreOperation::GetSettings => {
            let output = provider.handle_get_settings().await?;
            serialize(StatusCode::OK, &output, request_id)
        }
        BucketStoreOperation::SetAccessKey => {
            let input: SetAccessKeyInput = request.json_body()?;
            let output = provider.handle_set_access_key(input).await?;
            serialize(StatusCode::CREATED, &output, request_id)
        }
        BucketStoreOperation::ClearAccessKey => {
            let output = provider.handle_clear_access_key().await?;
            serialize(StatusCode::OK, &output, request_id)
        }
        BucketStoreOperation::SetSecretKey => {
            let input: SetSecretKeyInput = request.json_body()?;
            let output = provider.handle_set_secret_key(input).await?;
            serialize(StatusCode::CREATED, &output, request_id)
        }
        BucketStoreOperation::ClearSecretKey => {
            let output = provider.handle_clear_secret_key().await?;
            serialize(StatusCode::OK, &output, request_id)
        }
        BucketStoreOperation::SetRegion => {
            let input: SetRegionInput = request.json_body()?;
            let output = provider.handle_set_region(input).await?;
            serialize(StatusCode::CREATED, &output, request_id)
        }
        BucketStoreOperation::GetRegion => {
            let output = provider.handle_get_region().await?;
            serialize(StatusCode::OK, &output, request_id)
        }
    }
}

/// Serialize an output type into a JSON HTTP response.
fn serialize<T: serde::Serialize>(
    status: StatusCode,
    output: &T,
    request_id: &str,
) -> Result<http::Response<BucketStoreResponseBody>, BucketStoreError> {
    let json = serde_json::to_vec(output).map_err(|e| {
        BucketStoreError::internal_error(format!("failed to serialize response: {e}"))
    })?;
    Ok(json_response(status, json, request_id))
}
