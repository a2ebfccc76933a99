//! Bucket → region cache.
//!
//! Filled by the full bucket listing and by bucket creation, evicted on
//! bucket deletion. A miss is never an error: per-bucket operations fall
//! back to `us-east-1`.

use std::collections::BTreeSet;

use dashmap::DashMap;

use crate::types::AwsRegion;

/// Concurrent map from bucket name to the region it lives in.
#[derive(Debug, Default)]
pub struct BucketLocationCache {
    locations: DashMap<String, AwsRegion>,
}

impl BucketLocationCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember where `bucket` lives, replacing any previous entry.
    pub fn record(&self, bucket: impl Into<String>, region: AwsRegion) {
        self.locations.insert(bucket.into(), region);
    }

    /// Cached region for `bucket`, if any.
    #[must_use]
    pub fn get(&self, bucket: &str) -> Option<AwsRegion> {
        self.locations.get(bucket).map(|r| r.value().clone())
    }

    /// Region to operate on for `bucket`: the cached one, else `us-east-1`.
    #[must_use]
    pub fn resolve(&self, bucket: &str) -> AwsRegion {
        self.get(bucket).unwrap_or_default()
    }

    /// Drop the entry for `bucket`.
    pub fn evict(&self, bucket: &str) -> Option<AwsRegion> {
        self.locations.remove(bucket).map(|(_, region)| region)
    }

    /// Distinct regions currently cached.
    #[must_use]
    pub fn regions(&self) -> BTreeSet<AwsRegion> {
        self.locations.iter().map(|e| e.value().clone()).collect()
    }

    /// Number of cached buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}
