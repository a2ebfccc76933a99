//! Region identifiers.

use std::borrow::Borrow;
use std::fmt;

/// AWS Region identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct AwsRegion(String);

impl AwsRegion {
    /// Region S3 reports for buckets without a location constraint.
    pub const DEFAULT: &str = "us-east-1";

    /// Create a new region.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    /// Map a `GetBucketLocation` constraint to a region.
    ///
    /// An empty or absent constraint means the bucket lives in `us-east-1`;
    /// the legacy `EU` constraint means `eu-west-1`.
    #[must_use]
    pub fn from_location_constraint(constraint: Option<&str>) -> Self {
        match constraint.map(str::trim) {
            None | Some("") => Self::default(),
            Some("EU") => Self::new("eu-west-1"),
            Some(region) => Self::new(region),
        }
    }

    /// Get the region as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AwsRegion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for AwsRegion {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AwsRegion {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
