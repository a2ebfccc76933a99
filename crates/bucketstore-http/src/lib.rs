//! Bucket Store HTTP service layer.
//!
//! This crate turns HTTP requests into [`BucketStoreOperation`]s and handler
//! results back into JSON responses:
//!
//! - **Router**: maps method + path (with an optional `/api` prefix) to an operation
//! - **Request**: decoded query string and JSON body handed to the handler
//! - **Handler trait**: the boundary between HTTP and the provider
//! - **Service**: hyper `Service` implementation with CORS and request ids
//! - **Response helpers**: JSON success/error response formatting
//!
//! [`BucketStoreOperation`]: bucketstore_model::BucketStoreOperation
#![allow(missing_docs)]

pub mod body;
pub mod dispatch;
pub mod request;
pub mod response;
pub mod router;
pub mod service;

pub use body::BucketStoreResponseBody;
pub use dispatch::BucketStoreHandler;
pub use request::{ApiRequest, QueryParams};
pub use service::{BucketStoreHttpConfig, BucketStoreHttpService};
