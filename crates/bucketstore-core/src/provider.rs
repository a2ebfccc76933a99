//! Bucket Store provider implementing every API operation.
//!
//! Each `handle_*` method validates its input, resolves the acting region
//! (bucket location cache, falling back to `us-east-1`), looks up the
//! regional client, and calls the storage service. Storage failures are
//! reported with the service's message verbatim under a short summary of
//! the failed step.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::Mutex;
use tracing::{info, warn};

use bucketstore_model::error::BucketStoreError;
use bucketstore_model::input::{
    CreateBucketInput, DeleteBucketInput, DeleteDocumentsInput, GetUploadUrlInput,
    ListDocumentsInput, SetAccessKeyInput, SetRegionInput, SetSecretKeyInput,
};
use bucketstore_model::output::{
    AwsSettingsSummary, BucketEntry, ClearCredentialOutput, CreateBucketOutput,
    DeleteBucketOutput, DeleteDocumentsOutput, DocumentEntry, GetUploadUrlOutput,
    ListBucketsOutput, ListDocumentsOutput, PingOutput, RegionOutput, SetAccessKeyOutput,
    SetSecretKeyOutput, SettingsOutput,
};

use crate::client::StorageClient;
use crate::config::BucketStoreConfig;
use crate::error::SettingsError;
use crate::location::BucketLocationCache;
use crate::registry::{ClientRegistry, DEFAULT_ALIAS, StoredCredentials};
use crate::settings::{AwsSettings, SettingsStore};
use crate::types::AwsRegion;

/// Most keys S3 accepts in one `DeleteObjects` call.
const MAX_DELETE_BATCH: usize = 1000;

/// Number of trailing secret characters echoed back to the client.
const SECRET_VISIBLE_SUFFIX: usize = 4;

/// Which half of the credential pair a settings call touches.
#[derive(Debug, Clone, Copy)]
enum CredentialPart {
    Key,
    Secret,
}

impl CredentialPart {
    fn save_summary(self) -> &'static str {
        match self {
            Self::Key => "could not save key",
            Self::Secret => "could not save secret",
        }
    }
}

/// The Bucket Store provider.
#[derive(Debug, Clone)]
pub struct BucketStore {
    registry: Arc<ClientRegistry>,
    locations: Arc<BucketLocationCache>,
    settings: Arc<dyn SettingsStore>,
    settings_lock: Arc<Mutex<()>>,
    config: Arc<BucketStoreConfig>,
}

impl BucketStore {
    /// Create a provider around an existing registry and settings store.
    #[must_use]
    pub fn new(
        config: BucketStoreConfig,
        registry: Arc<ClientRegistry>,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            registry,
            locations: Arc::new(BucketLocationCache::new()),
            settings,
            settings_lock: Arc::new(Mutex::new(())),
            config: Arc::new(config),
        }
    }

    /// The client registry.
    #[must_use]
    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    /// The bucket location cache.
    #[must_use]
    pub fn locations(&self) -> &BucketLocationCache {
        &self.locations
    }

    /// The provider configuration.
    #[must_use]
    pub fn config(&self) -> &BucketStoreConfig {
        &self.config
    }

    /// Load persisted credentials and initialize the registry from them.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings store cannot be read.
    pub async fn init_from_settings(&self) -> Result<(), SettingsError> {
        let stored = self.settings.load().await?;
        self.registry.init(StoredCredentials {
            access_key: stored.key,
            secret_key: stored.secret,
        });
        Ok(())
    }

    // -- Buckets --

    /// `GET /buckets`: list every bucket and resolve its region.
    ///
    /// Location lookups run concurrently and fail independently; a failed
    /// lookup only leaves the bucket out of the cache. Every region observed
    /// gets a client so follow-up calls find one ready.
    pub async fn handle_list_buckets(&self) -> Result<ListBucketsOutput, BucketStoreError> {
        let client = self.client(DEFAULT_ALIAS)?;
        let buckets = client
            .list_buckets()
            .await
            .map_err(|e| e.into_api_error("could not fetch buckets"))?;

        let lookups = buckets.iter().map(|bucket| {
            let client = Arc::clone(&client);
            async move {
                let location = client.get_bucket_location(&bucket.name).await;
                (bucket.name.as_str(), location)
            }
        });
        let (resolved, failed): (Vec<_>, Vec<_>) = join_all(lookups)
            .await
            .into_iter()
            .partition(|(_, location)| location.is_ok());

        let mut observed = BTreeSet::new();
        for (name, location) in resolved {
            if let Ok(constraint) = location {
                let region = AwsRegion::from_location_constraint(constraint.as_deref());
                self.locations.record(name, region.clone());
                observed.insert(region);
            }
        }
        for (name, location) in failed {
            if let Err(e) = location {
                warn!(bucket = name, error = %e, "could not resolve bucket location");
            }
        }
        for region in &observed {
            self.registry.ensure_region(region.as_str());
        }

        Ok(ListBucketsOutput {
            buckets: buckets
                .into_iter()
                .map(|bucket| BucketEntry {
                    region: self.locations.resolve(&bucket.name).to_string(),
                    name: bucket.name,
                    created_at: bucket.created_at,
                })
                .collect(),
        })
    }

    /// `POST /buckets`: create a bucket in the requested region.
    pub async fn handle_create_bucket(
        &self,
        input: CreateBucketInput,
    ) -> Result<CreateBucketOutput, BucketStoreError> {
        let name = require(input.name, "name")?;
        let region = AwsRegion::new(require(input.region, "region")?);

        self.registry.ensure_region(region.as_str());
        let client = self.client(region.as_str())?;
        client
            .create_bucket(&name)
            .await
            .map_err(|e| e.into_api_error("could not create bucket"))?;

        self.locations.record(name.clone(), region.clone());
        info!(bucket = %name, %region, "created bucket");
        Ok(BucketEntry {
            name,
            created_at: Some(Utc::now()),
            region: region.to_string(),
        })
    }

    /// `DELETE /buckets`: empty the bucket page by page, then delete it.
    ///
    /// The first failing step aborts the whole operation; nothing is retried.
    pub async fn handle_delete_bucket(
        &self,
        input: DeleteBucketInput,
    ) -> Result<DeleteBucketOutput, BucketStoreError> {
        const SUMMARY: &str = "could not delete bucket";

        let not_deleted = |e: BucketStoreError| e.with_field("deleted", false);
        let name = require(input.name, "name").map_err(not_deleted)?;
        let (region, client) = self.client_for_bucket(&name).map_err(not_deleted)?;

        let mut continuation_token: Option<String> = None;
        let mut drained = 0_usize;
        loop {
            let page = client
                .list_objects(&name, continuation_token.as_deref(), None)
                .await
                .map_err(|e| not_deleted(e.into_api_error(SUMMARY)))?;

            if !page.objects.is_empty() {
                let keys: Vec<String> = page.objects.into_iter().map(|o| o.key).collect();
                let result = client
                    .delete_objects(&name, &keys)
                    .await
                    .map_err(|e| not_deleted(e.into_api_error(SUMMARY)))?;
                if let Some((key, message)) = result.failed.first() {
                    return Err(not_deleted(BucketStoreError::upstream(
                        SUMMARY,
                        format!("could not delete object {key}: {message}"),
                    )));
                }
                drained += result.deleted.len();
            }

            match page.next_continuation_token {
                Some(token) if page.is_truncated => continuation_token = Some(token),
                _ => break,
            }
        }

        client
            .delete_bucket(&name)
            .await
            .map_err(|e| not_deleted(e.into_api_error(SUMMARY)))?;
        self.locations.evict(&name);

        info!(bucket = %name, %region, objects = drained, "deleted bucket");
        Ok(DeleteBucketOutput { deleted: true })
    }

    // -- Documents --

    /// `GET /buckets/documents`: one page of the bucket's objects.
    pub async fn handle_list_documents(
        &self,
        input: ListDocumentsInput,
    ) -> Result<ListDocumentsOutput, BucketStoreError> {
        let bucket = require(input.bucket, "bucket")?;
        let (_, client) = self.client_for_bucket(&bucket)?;

        let page = client
            .list_objects(
                &bucket,
                input.continuation_token.as_deref(),
                Some(self.config.documents_page_size),
            )
            .await
            .map_err(|e| e.into_api_error("could not list objects"))?;

        Ok(ListDocumentsOutput {
            documents: page
                .objects
                .into_iter()
                .map(|o| DocumentEntry {
                    name: o.key,
                    last_modified: o.last_modified,
                    size: o.size,
                })
                .collect(),
            continuation_token: page.next_continuation_token.filter(|_| page.is_truncated),
        })
    }

    /// `GET /buckets/upload-url`: presigned `PUT` URL for a new object.
    pub async fn handle_get_upload_url(
        &self,
        input: GetUploadUrlInput,
    ) -> Result<GetUploadUrlOutput, BucketStoreError> {
        let bucket = require(input.bucket, "bucket")?;
        let filename = require(input.filename, "filename")?;
        let (_, client) = self.client_for_bucket(&bucket)?;

        let url = client
            .presign_put(
                &bucket,
                &filename,
                Duration::from_secs(self.config.upload_url_expiry_secs),
            )
            .await
            .map_err(|e| e.into_api_error("could not generate url"))?;
        Ok(GetUploadUrlOutput { url })
    }

    /// `DELETE /buckets/documents`: bulk delete the named objects.
    ///
    /// No filenames is a successful no-op.
    pub async fn handle_delete_documents(
        &self,
        input: DeleteDocumentsInput,
    ) -> Result<DeleteDocumentsOutput, BucketStoreError> {
        let bucket = require(input.bucket, "bucket")?;
        let filenames: Vec<String> = input
            .filenames
            .into_iter()
            .filter(|f| !f.is_empty())
            .collect();
        if filenames.is_empty() {
            return Ok(DeleteDocumentsOutput {
                deleted: true,
                count: 0,
                failed: 0,
            });
        }

        let (_, client) = self.client_for_bucket(&bucket)?;
        let mut count = 0;
        let mut failed = 0;
        for batch in filenames.chunks(MAX_DELETE_BATCH) {
            let result = client
                .delete_objects(&bucket, batch)
                .await
                .map_err(|e| e.into_api_error("could not delete objects"))?;
            for (key, message) in &result.failed {
                warn!(bucket = %bucket, key = %key, message = %message, "object not deleted");
            }
            count += result.deleted.len();
            failed += result.failed.len();
        }

        Ok(DeleteDocumentsOutput {
            deleted: failed == 0,
            count,
            failed,
        })
    }

    // -- Settings --

    /// `GET /settings`: what is configured, without revealing secrets.
    pub async fn handle_get_settings(&self) -> Result<SettingsOutput, BucketStoreError> {
        let settings = self.load_settings().await?;
        Ok(SettingsOutput {
            aws: AwsSettingsSummary {
                region: settings.region,
                key_configured: settings.key.is_some_and(|k| !k.is_empty()),
                secret_configured: settings.secret.is_some_and(|s| !s.is_empty()),
                initialized: self.registry.is_configured(),
            },
        })
    }

    /// `POST /settings/aws/key`: persist and apply a new access key id.
    pub async fn handle_set_access_key(
        &self,
        input: SetAccessKeyInput,
    ) -> Result<SetAccessKeyOutput, BucketStoreError> {
        let key = require(input.key, "key")?;
        self.update_credential(CredentialPart::Key, Some(key.clone()))
            .await?;
        Ok(SetAccessKeyOutput { key })
    }

    /// `DELETE /settings/aws/key`.
    pub async fn handle_clear_access_key(&self) -> Result<ClearCredentialOutput, BucketStoreError> {
        let cleared = self.update_credential(CredentialPart::Key, None).await?;
        Ok(ClearCredentialOutput { cleared })
    }

    /// `POST /settings/aws/secret`: persist and apply a new secret access
    /// key. Only the last few characters are echoed back.
    pub async fn handle_set_secret_key(
        &self,
        input: SetSecretKeyInput,
    ) -> Result<SetSecretKeyOutput, BucketStoreError> {
        let secret = require(input.secret, "secret")?;
        let masked = mask_secret(&secret);
        self.update_credential(CredentialPart::Secret, Some(secret))
            .await?;
        Ok(SetSecretKeyOutput { secret: masked })
    }

    /// `DELETE /settings/aws/secret`.
    pub async fn handle_clear_secret_key(&self) -> Result<ClearCredentialOutput, BucketStoreError> {
        let cleared = self.update_credential(CredentialPart::Secret, None).await?;
        Ok(ClearCredentialOutput { cleared })
    }

    /// `POST /settings/aws/region`: persist the preferred region.
    ///
    /// The registry's default region is fixed at startup and is not changed.
    pub async fn handle_set_region(
        &self,
        input: SetRegionInput,
    ) -> Result<RegionOutput, BucketStoreError> {
        let region = require(input.region, "region")?;
        let _guard = self.settings_lock.lock().await;
        let mut settings = self.load_settings().await?;
        settings.region = Some(region.clone());
        self.settings
            .save(settings)
            .await
            .map_err(|e| e.into_api_error("could not save region"))?;
        Ok(RegionOutput {
            region: Some(region),
        })
    }

    /// `GET /settings/aws/region`.
    pub async fn handle_get_region(&self) -> Result<RegionOutput, BucketStoreError> {
        let settings = self.load_settings().await?;
        Ok(RegionOutput {
            region: settings.region,
        })
    }

    /// `GET /ping`.
    #[must_use]
    pub fn handle_ping(&self) -> PingOutput {
        PingOutput {
            message: "pong".to_owned(),
            time: Utc::now(),
        }
    }

    // -- Internals --

    fn client(&self, region: &str) -> Result<Arc<dyn StorageClient>, BucketStoreError> {
        self.registry
            .client_for(region)
            .ok_or_else(BucketStoreError::not_initialized)
    }

    fn client_for_bucket(
        &self,
        bucket: &str,
    ) -> Result<(AwsRegion, Arc<dyn StorageClient>), BucketStoreError> {
        let region = self.locations.resolve(bucket);
        self.registry.ensure_region(region.as_str());
        let client = self.client(region.as_str())?;
        Ok((region, client))
    }

    async fn load_settings(&self) -> Result<AwsSettings, BucketStoreError> {
        self.settings
            .load()
            .await
            .map_err(|e| e.into_api_error("could not read settings"))
    }

    /// Persist one credential component, then apply it to the registry.
    /// A failed save leaves the registry untouched.
    ///
    /// Returns whether a non-empty value was stored before the update.
    async fn update_credential(
        &self,
        part: CredentialPart,
        value: Option<String>,
    ) -> Result<bool, BucketStoreError> {
        let _guard = self.settings_lock.lock().await;
        let mut settings = self.load_settings().await?;
        let previous = match part {
            CredentialPart::Key => std::mem::replace(&mut settings.key, value.clone()),
            CredentialPart::Secret => std::mem::replace(&mut settings.secret, value.clone()),
        };
        self.settings
            .save(settings)
            .await
            .map_err(|e| e.into_api_error(part.save_summary()))?;

        match part {
            CredentialPart::Key => self.registry.set_key(value),
            CredentialPart::Secret => self.registry.set_secret(value),
        }
        Ok(previous.is_some_and(|v| !v.is_empty()))
    }
}

fn require(value: Option<String>, field: &str) -> Result<String, BucketStoreError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| BucketStoreError::missing_field(field))
}

fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let visible = if chars.len() > SECRET_VISIBLE_SUFFIX {
        SECRET_VISIBLE_SUFFIX
    } else {
        0
    };
    let hidden = chars.len() - visible;
    std::iter::repeat_n('*', hidden)
        .chain(chars[hidden..].iter().copied())
        .collect()
}
