//! Model types for the Bucket Store API.
//!
//! The API is a small JSON-over-HTTP surface in front of S3, so all input and
//! output shapes are hand-written serde structs. Field names on the wire are
//! fixed (`created_at`, `last_modified`, `"continuation-token"`, ...) and are
//! pinned with explicit renames where Rust naming differs.
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod input;
pub mod operations;
pub mod output;

pub use error::{BucketStoreError, BucketStoreErrorCode};
pub use operations::BucketStoreOperation;
