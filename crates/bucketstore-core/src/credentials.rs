//! AWS credential state.
//!
//! A client can only be built from a complete key/secret pair. Rather than two
//! independently nullable strings, [`Credentials`] makes "both or neither"
//! structural: a partial pair is still [`Credentials::Unconfigured`].

use std::fmt;

/// A complete access key id / secret access key pair.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessKeyPair {
    access_key_id: String,
    secret_access_key: String,
}

impl AccessKeyPair {
    /// Create a pair.
    #[must_use]
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    /// The access key id.
    #[must_use]
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// The secret access key.
    #[must_use]
    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }
}

impl fmt::Debug for AccessKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessKeyPair")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .finish()
    }
}

/// Current credential state of the registry.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// At least one component is missing. Whatever was supplied is kept until
    /// the other half arrives.
    Unconfigured {
        /// Access key id, if supplied.
        access_key: Option<String>,
        /// Secret access key, if supplied.
        secret_key: Option<String>,
    },
    /// Both components present.
    Configured(AccessKeyPair),
}

impl Default for Credentials {
    fn default() -> Self {
        Self::Unconfigured {
            access_key: None,
            secret_key: None,
        }
    }
}

impl Credentials {
    /// Build the state from two optional components. Empty strings count as
    /// absent.
    #[must_use]
    pub fn from_parts(access_key: Option<String>, secret_key: Option<String>) -> Self {
        match (non_empty(access_key), non_empty(secret_key)) {
            (Some(key), Some(secret)) => Self::Configured(AccessKeyPair::new(key, secret)),
            (access_key, secret_key) => Self::Unconfigured {
                access_key,
                secret_key,
            },
        }
    }

    /// Replace the access key id, keeping the secret.
    #[must_use]
    pub fn with_access_key(self, access_key: Option<String>) -> Self {
        let (_, secret) = self.into_parts();
        Self::from_parts(access_key, secret)
    }

    /// Replace the secret access key, keeping the access key id.
    #[must_use]
    pub fn with_secret_key(self, secret_key: Option<String>) -> Self {
        let (key, _) = self.into_parts();
        Self::from_parts(key, secret_key)
    }

    /// The complete pair, if configured.
    #[must_use]
    pub fn pair(&self) -> Option<&AccessKeyPair> {
        match self {
            Self::Configured(pair) => Some(pair),
            Self::Unconfigured { .. } => None,
        }
    }

    /// Whether a complete pair is present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Configured(_))
    }

    fn into_parts(self) -> (Option<String>, Option<String>) {
        match self {
            Self::Configured(pair) => (Some(pair.access_key_id), Some(pair.secret_access_key)),
            Self::Unconfigured {
                access_key,
                secret_key,
            } => (access_key, secret_key),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configured(pair) => f.debug_tuple("Configured").field(pair).finish(),
            Self::Unconfigured {
                access_key,
                secret_key,
            } => f
                .debug_struct("Unconfigured")
                .field("access_key", access_key)
                .field("secret_key", &secret_key.as_ref().map(|_| "***"))
                .finish(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
