//! Core of Bucket Store: regional S3 clients and the API provider.
//!
//! # Architecture
//!
//! ```text
//! bucketstore-http (routing, JSON)
//!        |
//!        v
//! BucketStoreHandler (handler.rs)
//!        |
//!        v
//! BucketStore provider ----> SettingsStore (persisted credentials)
//!        |
//!        +--> BucketLocationCache (bucket -> region)
//!        |
//!        v
//! ClientRegistry (region -> StorageClient, rebuilt on credential change)
//!        |
//!        v
//! AwsStorageClient (aws-sdk-s3)
//! ```

pub mod aws;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod handler;
pub mod location;
pub mod provider;
pub mod registry;
pub mod settings;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::BucketStoreConfig;
pub use handler::BucketStoreApiHandler;
pub use provider::BucketStore;
pub use registry::ClientRegistry;
pub use types::AwsRegion;
