//! Regional client registry.
//!
//! [`ClientRegistry`] owns the user's AWS credentials and one storage client
//! per region. S3 buckets are region-pinned, so every per-bucket call must go
//! through a client for the bucket's region; clients are created lazily the
//! first time a region is needed.
//!
//! Invariants:
//!
//! - Either every entry is `None` (no complete credential pair) or every entry
//!   holds a client built from the *current* pair. Credential rotation
//!   rebuilds all known regions under the same write lock that swaps the
//!   credentials, so no reader can observe a stale client.
//! - The `"default"` alias resolves to the entry of the configured default
//!   region at lookup time, so both names always yield the same `Arc`.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::client::{ClientFactory, StorageClient};
use crate::credentials::Credentials;
use crate::types::AwsRegion;

/// Lookup alias for the default region's client.
pub const DEFAULT_ALIAS: &str = "default";

/// Credentials loaded from persistent storage at startup.
#[derive(Debug, Clone, Default)]
pub struct StoredCredentials {
    /// Stored access key id.
    pub access_key: Option<String>,
    /// Stored secret access key.
    pub secret_key: Option<String>,
}

#[derive(Debug)]
struct RegistryState {
    credentials: Credentials,
    clients: BTreeMap<AwsRegion, Option<Arc<dyn StorageClient>>>,
}

/// Thread-safe region → client map bound to one credential pair.
#[derive(Debug)]
pub struct ClientRegistry {
    default_region: AwsRegion,
    factory: Arc<dyn ClientFactory>,
    state: RwLock<RegistryState>,
}

impl ClientRegistry {
    /// Create a registry with no credentials. The default region is known
    /// from the start but holds no client.
    #[must_use]
    pub fn new(default_region: AwsRegion, factory: Arc<dyn ClientFactory>) -> Self {
        let mut clients = BTreeMap::new();
        clients.insert(default_region.clone(), None);
        Self {
            default_region,
            factory,
            state: RwLock::new(RegistryState {
                credentials: Credentials::default(),
                clients,
            }),
        }
    }

    /// The configured default region.
    #[must_use]
    pub fn default_region(&self) -> &AwsRegion {
        &self.default_region
    }

    /// Install credentials loaded from storage.
    ///
    /// With a complete pair, clients are built for every known region
    /// (initially just the default region); otherwise every entry is cleared.
    pub fn init(&self, stored: StoredCredentials) {
        let mut state = self.state.write();
        state.credentials = Credentials::from_parts(stored.access_key, stored.secret_key);
        self.regenerate(&mut state);
        info!(
            configured = state.credentials.is_configured(),
            default_region = %self.default_region,
            "client registry initialized",
        );
    }

    /// Make sure a client exists for `region`.
    ///
    /// No-op without a complete credential pair, or when a client for the
    /// region already exists.
    pub fn ensure_region(&self, region: &str) {
        let region = self.canonical(region);
        {
            let state = self.state.read();
            if state.credentials.pair().is_none() {
                return;
            }
            if matches!(state.clients.get(&region), Some(Some(_))) {
                return;
            }
        }

        let mut state = self.state.write();
        // Re-check: credentials or the entry may have changed while unlocked.
        let Some(pair) = state.credentials.pair().cloned() else {
            return;
        };
        if matches!(state.clients.get(&region), Some(Some(_))) {
            return;
        }
        let client = self.factory.build(&region, &pair);
        debug!(%region, "materialized regional client");
        state.clients.insert(region, Some(client));
    }

    /// Pure lookup; never creates a client.
    ///
    /// `"default"` resolves to the default region's client.
    #[must_use]
    pub fn client_for(&self, region: &str) -> Option<Arc<dyn StorageClient>> {
        let region = self.canonical(region);
        self.state
            .read()
            .clients
            .get(&region)
            .and_then(Clone::clone)
    }

    /// Replace the access key id and rebuild every known region's client.
    pub fn set_key(&self, key: Option<String>) {
        let mut state = self.state.write();
        state.credentials = std::mem::take(&mut state.credentials).with_access_key(key);
        self.regenerate(&mut state);
        info!(
            configured = state.credentials.is_configured(),
            "access key updated"
        );
    }

    /// Replace the secret access key and rebuild every known region's client.
    pub fn set_secret(&self, secret: Option<String>) {
        let mut state = self.state.write();
        state.credentials = std::mem::take(&mut state.credentials).with_secret_key(secret);
        self.regenerate(&mut state);
        info!(
            configured = state.credentials.is_configured(),
            "secret key updated"
        );
    }

    /// Whether a complete credential pair is installed.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.state.read().credentials.is_configured()
    }

    /// Every region an entry exists for, with or without a client.
    #[must_use]
    pub fn known_regions(&self) -> Vec<AwsRegion> {
        self.state.read().clients.keys().cloned().collect()
    }

    /// Rebuild (or clear) every entry from the current credentials.
    fn regenerate(&self, state: &mut RegistryState) {
        state
            .clients
            .entry(self.default_region.clone())
            .or_insert(None);

        match state.credentials.pair().cloned() {
            Some(pair) => {
                for (region, slot) in &mut state.clients {
                    *slot = Some(self.factory.build(region, &pair));
                }
                debug!(regions = state.clients.len(), "regenerated regional clients");
            }
            None => {
                for slot in state.clients.values_mut() {
                    *slot = None;
                }
                debug!("cleared regional clients");
            }
        }
    }

    fn canonical(&self, region: &str) -> AwsRegion {
        if region == DEFAULT_ALIAS {
            self.default_region.clone()
        } else {
            AwsRegion::new(region)
        }
    }
}
