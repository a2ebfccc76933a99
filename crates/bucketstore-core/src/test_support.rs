//! In-memory storage fakes shared by the unit tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::client::{
    BucketSummary, ClientFactory, DeleteObjectsResult, ObjectPage, ObjectSummary, StorageClient,
};
use crate::credentials::AccessKeyPair;
use crate::error::StorageError;
use crate::types::AwsRegion;

#[derive(Debug)]
struct FakeBucket {
    region: AwsRegion,
    created_at: DateTime<Utc>,
    objects: BTreeMap<String, i64>,
}

#[derive(Debug)]
struct BackendState {
    buckets: BTreeMap<String, FakeBucket>,
    page_size: usize,
    failing_locations: HashSet<String>,
    failing_keys: HashSet<String>,
    fail_delete_objects_call: Option<usize>,
    fail_list_buckets: Option<String>,
    delete_objects_calls: usize,
    calls: Vec<String>,
}

impl Default for BackendState {
    fn default() -> Self {
        Self {
            buckets: BTreeMap::new(),
            page_size: 1000,
            failing_locations: HashSet::new(),
            failing_keys: HashSet::new(),
            fail_delete_objects_call: None,
            fail_list_buckets: None,
            delete_objects_calls: 0,
            calls: Vec::new(),
        }
    }
}

/// The fake "S3 account" every fake client talks to.
#[derive(Debug, Default)]
pub(crate) struct FakeBackend {
    state: Mutex<BackendState>,
}

impl FakeBackend {
    pub(crate) fn add_bucket(&self, name: &str, region: &str, objects: usize) {
        let objects = (0..objects).map(|i| (format!("obj-{i:04}"), 10)).collect();
        self.state.lock().buckets.insert(
            name.to_owned(),
            FakeBucket {
                region: AwsRegion::new(region),
                created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default(),
                objects,
            },
        );
    }

    pub(crate) fn set_page_size(&self, page_size: usize) {
        self.state.lock().page_size = page_size;
    }

    pub(crate) fn fail_location_of(&self, bucket: &str) {
        self.state.lock().failing_locations.insert(bucket.to_owned());
    }

    pub(crate) fn fail_key(&self, key: &str) {
        self.state.lock().failing_keys.insert(key.to_owned());
    }

    /// Make the `n`th (1-based) `delete_objects` call fail.
    pub(crate) fn fail_delete_objects_call(&self, n: usize) {
        self.state.lock().fail_delete_objects_call = Some(n);
    }

    pub(crate) fn fail_list_buckets(&self, message: &str) {
        self.state.lock().fail_list_buckets = Some(message.to_owned());
    }

    pub(crate) fn has_bucket(&self, name: &str) -> bool {
        self.state.lock().buckets.contains_key(name)
    }

    pub(crate) fn object_count(&self, bucket: &str) -> usize {
        self.state
            .lock()
            .buckets
            .get(bucket)
            .map_or(0, |b| b.objects.len())
    }

    pub(crate) fn bucket_region(&self, bucket: &str) -> Option<String> {
        self.state
            .lock()
            .buckets
            .get(bucket)
            .map(|b| b.region.to_string())
    }

    /// Every call issued so far, as `"<operation>:<bucket>[:<detail>]"`.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    pub(crate) fn calls_matching(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }
}

fn bucket_in<'a>(
    state: &'a mut BackendState,
    bucket: &str,
    region: &AwsRegion,
) -> Result<&'a mut FakeBucket, StorageError> {
    let Some(entry) = state.buckets.get_mut(bucket) else {
        return Err(StorageError::new(
            Some("NoSuchBucket".to_owned()),
            "The specified bucket does not exist",
        ));
    };
    if &entry.region != region {
        return Err(StorageError::new(
            Some("PermanentRedirect".to_owned()),
            "The bucket you are attempting to access must be addressed using the specified endpoint.",
        ));
    }
    Ok(entry)
}

/// A fake regional client.
#[derive(Debug)]
pub(crate) struct FakeStorageClient {
    region: AwsRegion,
    credentials: AccessKeyPair,
    backend: Arc<FakeBackend>,
}

#[async_trait]
impl StorageClient for FakeStorageClient {
    fn region(&self) -> &AwsRegion {
        &self.region
    }

    async fn list_buckets(&self) -> Result<Vec<BucketSummary>, StorageError> {
        let mut state = self.backend.state.lock();
        state.calls.push("list_buckets".to_owned());
        if let Some(message) = &state.fail_list_buckets {
            return Err(StorageError::new(
                Some("InvalidAccessKeyId".to_owned()),
                message.clone(),
            ));
        }
        Ok(state
            .buckets
            .iter()
            .map(|(name, b)| BucketSummary {
                name: name.clone(),
                created_at: Some(b.created_at),
            })
            .collect())
    }

    async fn get_bucket_location(&self, bucket: &str) -> Result<Option<String>, StorageError> {
        let mut state = self.backend.state.lock();
        state.calls.push(format!("get_bucket_location:{bucket}"));
        if state.failing_locations.contains(bucket) {
            return Err(StorageError::new(Some("AccessDenied".to_owned()), "Access Denied"));
        }
        let region = state
            .buckets
            .get(bucket)
            .map(|b| b.region.clone())
            .ok_or_else(|| {
                StorageError::new(
                    Some("NoSuchBucket".to_owned()),
                    "The specified bucket does not exist",
                )
            })?;
        Ok((region.as_str() != AwsRegion::DEFAULT).then(|| region.to_string()))
    }

    async fn create_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        let mut state = self.backend.state.lock();
        state.calls.push(format!("create_bucket:{bucket}"));
        if state.buckets.contains_key(bucket) {
            return Err(StorageError::new(
                Some("BucketAlreadyOwnedByYou".to_owned()),
                "Your previous request to create the named bucket succeeded and you already own it.",
            ));
        }
        state.buckets.insert(
            bucket.to_owned(),
            FakeBucket {
                region: self.region.clone(),
                created_at: Utc::now(),
                objects: BTreeMap::new(),
            },
        );
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        let mut state = self.backend.state.lock();
        state.calls.push(format!("delete_bucket:{bucket}"));
        let entry = bucket_in(&mut state, bucket, &self.region)?;
        if !entry.objects.is_empty() {
            return Err(StorageError::new(
                Some("BucketNotEmpty".to_owned()),
                "The bucket you tried to delete is not empty",
            ));
        }
        state.buckets.remove(bucket);
        Ok(())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        continuation_token: Option<&str>,
        max_keys: Option<i32>,
    ) -> Result<ObjectPage, StorageError> {
        let mut state = self.backend.state.lock();
        state.calls.push(format!("list_objects:{bucket}"));
        let page_size = max_keys
            .and_then(|n| usize::try_from(n).ok())
            .map_or(state.page_size, |n| n.min(state.page_size));
        let entry = bucket_in(&mut state, bucket, &self.region)?;

        let remaining: Vec<_> = entry
            .objects
            .iter()
            .filter(|(key, _)| continuation_token.is_none_or(|token| key.as_str() > token))
            .collect();
        let is_truncated = remaining.len() > page_size;
        let objects: Vec<ObjectSummary> = remaining
            .into_iter()
            .take(page_size)
            .map(|(key, size)| ObjectSummary {
                key: key.clone(),
                last_modified: None,
                size: Some(*size),
            })
            .collect();
        let next_continuation_token = if is_truncated {
            objects.last().map(|o| o.key.clone())
        } else {
            None
        };
        Ok(ObjectPage {
            objects,
            is_truncated,
            next_continuation_token,
        })
    }

    async fn delete_objects(
        &self,
        bucket: &str,
        keys: &[String],
    ) -> Result<DeleteObjectsResult, StorageError> {
        let mut state = self.backend.state.lock();
        state.delete_objects_calls += 1;
        let call = state.delete_objects_calls;
        state
            .calls
            .push(format!("delete_objects:{bucket}:{}", keys.len()));
        if state.fail_delete_objects_call == Some(call) {
            return Err(StorageError::new(
                Some("InternalError".to_owned()),
                "We encountered an internal error. Please try again.",
            ));
        }

        let failing_keys = state.failing_keys.clone();
        let entry = bucket_in(&mut state, bucket, &self.region)?;
        let mut result = DeleteObjectsResult::default();
        for key in keys {
            if failing_keys.contains(key) {
                result.failed.push((key.clone(), "Access Denied".to_owned()));
            } else {
                entry.objects.remove(key);
                result.deleted.push(key.clone());
            }
        }
        Ok(result)
    }

    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        let mut state = self.backend.state.lock();
        state.calls.push(format!("presign_put:{bucket}"));
        Ok(format!(
            "https://{bucket}.s3.{}.amazonaws.com/{key}?X-Amz-Credential={}&X-Amz-Expires={}",
            self.region,
            self.credentials.access_key_id(),
            expires_in.as_secs(),
        ))
    }
}

/// Builds [`FakeStorageClient`]s against one shared [`FakeBackend`] and
/// remembers everything it built.
#[derive(Debug, Default)]
pub(crate) struct FakeFactory {
    backend: Arc<FakeBackend>,
    built: Mutex<Vec<Arc<FakeStorageClient>>>,
}

impl FakeFactory {
    pub(crate) fn backend(&self) -> &FakeBackend {
        &self.backend
    }

    pub(crate) fn builds(&self) -> usize {
        self.built.lock().len()
    }

    pub(crate) fn builds_for(&self, region: &str) -> usize {
        self.built
            .lock()
            .iter()
            .filter(|c| c.region.as_str() == region)
            .count()
    }

    /// Credentials a client handed out by this factory was built with.
    ///
    /// # Panics
    ///
    /// Panics if the client was not built by this factory.
    pub(crate) fn credentials_of(&self, client: &Arc<dyn StorageClient>) -> AccessKeyPair {
        let target = Arc::as_ptr(client).cast::<()>();
        self.built
            .lock()
            .iter()
            .find(|c| Arc::as_ptr(c).cast::<()>() == target)
            .map(|c| c.credentials.clone())
            .expect("client built by this factory")
    }
}

impl ClientFactory for FakeFactory {
    fn build(&self, region: &AwsRegion, credentials: &AccessKeyPair) -> Arc<dyn StorageClient> {
        let client = Arc::new(FakeStorageClient {
            region: region.clone(),
            credentials: credentials.clone(),
            backend: Arc::clone(&self.backend),
        });
        self.built.lock().push(Arc::clone(&client));
        client
    }
}
