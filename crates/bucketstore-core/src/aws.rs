//! [`StorageClient`] over `aws-sdk-s3`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials as SdkCredentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, Delete, ObjectIdentifier,
};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::client::{
    BucketSummary, ClientFactory, DeleteObjectsResult, ObjectPage, ObjectSummary, StorageClient,
};
use crate::credentials::AccessKeyPair;
use crate::error::StorageError;
use crate::types::AwsRegion;

/// Provider name attached to static SDK credentials.
const CREDENTIALS_PROVIDER_NAME: &str = "bucket-store";

/// Builds [`AwsStorageClient`]s.
#[derive(Debug, Clone, Default)]
pub struct AwsClientFactory {
    endpoint_url: Option<String>,
    force_path_style: bool,
}

impl AwsClientFactory {
    /// Create a factory targeting real AWS.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Target an S3-compatible endpoint instead of AWS.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint_url: Option<String>, force_path_style: bool) -> Self {
        self.endpoint_url = endpoint_url;
        self.force_path_style = force_path_style;
        self
    }
}

impl ClientFactory for AwsClientFactory {
    fn build(&self, region: &AwsRegion, credentials: &AccessKeyPair) -> Arc<dyn StorageClient> {
        let creds = SdkCredentials::new(
            credentials.access_key_id(),
            credentials.secret_access_key(),
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        );

        let mut builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.as_str().to_owned()))
            .credentials_provider(creds)
            .force_path_style(self.force_path_style);
        if let Some(endpoint) = &self.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }

        debug!(%region, "built regional s3 client");
        Arc::new(AwsStorageClient {
            region: region.clone(),
            inner: aws_sdk_s3::Client::from_conf(builder.build()),
        })
    }
}

/// An `aws_sdk_s3::Client` pinned to one region.
#[derive(Debug, Clone)]
pub struct AwsStorageClient {
    region: AwsRegion,
    inner: aws_sdk_s3::Client,
}

#[async_trait]
impl StorageClient for AwsStorageClient {
    fn region(&self) -> &AwsRegion {
        &self.region
    }

    async fn list_buckets(&self) -> Result<Vec<BucketSummary>, StorageError> {
        let output = self.inner.list_buckets().send().await.map_err(sdk_error)?;
        Ok(output
            .buckets()
            .iter()
            .filter_map(|b| {
                b.name().map(|name| BucketSummary {
                    name: name.to_owned(),
                    created_at: b.creation_date().and_then(to_chrono),
                })
            })
            .collect())
    }

    async fn get_bucket_location(&self, bucket: &str) -> Result<Option<String>, StorageError> {
        let output = self
            .inner
            .get_bucket_location()
            .bucket(bucket)
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(output
            .location_constraint()
            .map(|c| c.as_str().to_owned())
            .filter(|c| !c.is_empty()))
    }

    async fn create_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        let mut request = self.inner.create_bucket().bucket(bucket);
        // us-east-1 rejects an explicit location constraint; every other
        // region requires one.
        if self.region.as_str() != AwsRegion::DEFAULT {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }
        request.send().await.map_err(sdk_error)?;
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        self.inner
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        continuation_token: Option<&str>,
        max_keys: Option<i32>,
    ) -> Result<ObjectPage, StorageError> {
        let output = self
            .inner
            .list_objects_v2()
            .bucket(bucket)
            .set_continuation_token(continuation_token.map(ToOwned::to_owned))
            .set_max_keys(max_keys)
            .send()
            .await
            .map_err(sdk_error)?;

        Ok(ObjectPage {
            objects: output
                .contents()
                .iter()
                .filter_map(|o| {
                    o.key().map(|key| ObjectSummary {
                        key: key.to_owned(),
                        last_modified: o.last_modified().and_then(to_chrono),
                        size: o.size(),
                    })
                })
                .collect(),
            is_truncated: output.is_truncated().unwrap_or(false),
            next_continuation_token: output.next_continuation_token().map(ToOwned::to_owned),
        })
    }

    async fn delete_objects(
        &self,
        bucket: &str,
        keys: &[String],
    ) -> Result<DeleteObjectsResult, StorageError> {
        let identifiers = keys
            .iter()
            .map(|key| ObjectIdentifier::builder().key(key).build())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StorageError::new(None, e.to_string()))?;
        let delete = Delete::builder()
            .set_objects(Some(identifiers))
            .quiet(false)
            .build()
            .map_err(|e| StorageError::new(None, e.to_string()))?;

        let output = self
            .inner
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(sdk_error)?;

        Ok(DeleteObjectsResult {
            deleted: output
                .deleted()
                .iter()
                .filter_map(|d| d.key().map(ToOwned::to_owned))
                .collect(),
            failed: output
                .errors()
                .iter()
                .map(|e| {
                    (
                        e.key().unwrap_or_default().to_owned(),
                        e.message().unwrap_or_default().to_owned(),
                    )
                })
                .collect(),
        })
    }

    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        let presigning =
            PresigningConfig::expires_in(expires_in).map_err(|e| StorageError::new(None, e.to_string()))?;
        let request = self
            .inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(sdk_error)?;
        Ok(request.uri().to_owned())
    }
}

/// Convert an SDK failure, keeping the service's code and message verbatim.
fn sdk_error<E, R>(err: SdkError<E, R>) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    let code = err.code().map(ToOwned::to_owned);
    let message = err
        .message()
        .map_or_else(|| DisplayErrorContext(&err).to_string(), ToOwned::to_owned);
    StorageError::new(code, message)
}

fn to_chrono(dt: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> AwsClientFactory {
        AwsClientFactory::new().with_endpoint(Some("http://localhost:4566".to_owned()), true)
    }

    #[test]
    fn test_should_pin_built_client_to_region() {
        let client = factory().build(
            &AwsRegion::new("eu-west-1"),
            &AccessKeyPair::new("AKIDEXAMPLE", "secret"),
        );
        assert_eq!(client.region().as_str(), "eu-west-1");
    }

    #[tokio::test]
    async fn test_should_presign_put_url_locally() {
        let client = factory().build(
            &AwsRegion::new("us-east-1"),
            &AccessKeyPair::new("AKIDEXAMPLE", "secret"),
        );
        let url = client
            .presign_put("photos", "cat.png", Duration::from_secs(3600))
            .await
            .expect("presign");
        assert!(url.starts_with("http://localhost:4566/photos/cat.png?"));
        assert!(url.contains("X-Amz-Expires=3600"));
        assert!(url.contains("X-Amz-Credential=AKIDEXAMPLE"));
    }

    #[test]
    fn test_should_convert_sdk_datetime() {
        let dt = aws_sdk_s3::primitives::DateTime::from_secs(1_700_000_000);
        let converted = to_chrono(&dt).expect("valid timestamp");
        assert_eq!(converted.timestamp(), 1_700_000_000);
    }
}
