//! Integration tests for Bucket Store.
//!
//! These tests require a running `bucketstore-server` at `localhost:8080`
//! whose `S3_ENDPOINT_URL` points at an S3-compatible emulator on
//! `localhost:4566` (path-style). They are marked `#[ignore]` so they don't
//! run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p bucketstore-integration -- --ignored
//! ```

use std::sync::Once;

use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use serde_json::{Value, json};

static INIT: Once = Once::new();

/// Access key the emulator accepts.
pub const TEST_ACCESS_KEY: &str = "test";

/// Secret key the emulator accepts.
pub const TEST_SECRET_KEY: &str = "test";

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Base URL of the Bucket Store server.
#[must_use]
pub fn base_url() -> String {
    std::env::var("BUCKET_STORE_URL").unwrap_or_else(|_| "http://localhost:8080".to_owned())
}

/// Endpoint URL of the S3 emulator behind the server.
fn s3_endpoint_url() -> String {
    std::env::var("S3_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:4566".to_owned())
}

/// Create an HTTP client for the Bucket Store API.
#[must_use]
pub fn api_client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::new()
}

/// Create an S3 client talking to the emulator directly, for seeding and
/// checking state behind the server's back.
#[must_use]
pub fn s3_client() -> aws_sdk_s3::Client {
    init_tracing();

    let creds = Credentials::new(
        TEST_ACCESS_KEY,
        TEST_SECRET_KEY,
        None,
        None,
        "integration-test",
    );

    let config = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(creds)
        .endpoint_url(s3_endpoint_url())
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(config)
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// Store the emulator's credentials through the settings API.
pub async fn configure_credentials(client: &reqwest::Client) -> anyhow::Result<()> {
    let base = base_url();
    client
        .post(format!("{base}/settings/aws/key"))
        .json(&json!({ "key": TEST_ACCESS_KEY }))
        .send()
        .await?
        .error_for_status()?;
    client
        .post(format!("{base}/settings/aws/secret"))
        .json(&json!({ "secret": TEST_SECRET_KEY }))
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

/// Send a request and return its status plus JSON body.
pub async fn send_json(request: reqwest::RequestBuilder) -> anyhow::Result<(u16, Value)> {
    let response = request.send().await?;
    let status = response.status().as_u16();
    let body = response.json::<Value>().await?;
    Ok((status, body))
}

/// Create a bucket through the API and return its name.
pub async fn create_bucket(client: &reqwest::Client, prefix: &str) -> anyhow::Result<String> {
    let name = test_bucket_name(prefix);
    let (status, body) = send_json(
        client
            .post(format!("{}/buckets", base_url()))
            .json(&json!({ "name": name, "region": "us-east-1" })),
    )
    .await?;
    anyhow::ensure!(status == 201, "create bucket {name} failed: {body}");
    Ok(name)
}

/// Upload `count` small objects directly to the emulator.
pub async fn seed_objects(s3: &aws_sdk_s3::Client, bucket: &str, count: usize) {
    for i in 0..count {
        s3.put_object()
            .bucket(bucket)
            .key(format!("doc-{i:03}.txt"))
            .body(aws_sdk_s3::primitives::ByteStream::from_static(b"hello"))
            .send()
            .await
            .unwrap_or_else(|e| panic!("failed to seed {bucket}/doc-{i:03}.txt: {e}"));
    }
}

mod test_buckets;
mod test_documents;
mod test_settings;
