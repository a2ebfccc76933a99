//! Bucket Store Server - S3 bucket management behind a small JSON API.
//!
//! Lists, creates and deletes buckets across regions, pages through and
//! deletes documents, and hands out presigned upload URLs. AWS credentials
//! are supplied at runtime through the settings routes and persisted to a
//! JSON file.
//!
//! # Usage
//!
//! ```text
//! GATEWAY_LISTEN=0.0.0.0:8080 bucketstore-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:8080` | Bind address |
//! | `DEFAULT_REGION` | `us-east-1` | Region of the default client |
//! | `SETTINGS_PATH` | `./data/settings.json` | Persisted AWS settings |
//! | `S3_ENDPOINT_URL` | *(unset)* | S3-compatible endpoint override |
//! | `S3_FORCE_PATH_STYLE` | `false` | Path-style bucket addressing |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use bucketstore_core::aws::AwsClientFactory;
use bucketstore_core::settings::{JsonFileSettingsStore, SettingsStore};
use bucketstore_core::{
    AwsRegion, BucketStore, BucketStoreApiHandler, BucketStoreConfig, ClientRegistry,
};
use bucketstore_http::dispatch::BucketStoreHandler;
use bucketstore_http::service::{BucketStoreHttpConfig, BucketStoreHttpService};

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Wire the registry, settings store and provider together.
fn build_provider(config: &BucketStoreConfig, settings: Arc<dyn SettingsStore>) -> BucketStore {
    let factory = AwsClientFactory::new()
        .with_endpoint(config.s3_endpoint_url.clone(), config.s3_force_path_style);
    let registry = Arc::new(ClientRegistry::new(
        AwsRegion::new(config.default_region.clone()),
        Arc::new(factory),
    ));
    BucketStore::new(config.clone(), registry, settings)
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve<H: BucketStoreHandler>(
    listener: TcpListener,
    service: BucketStoreHttpService<H>,
) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Request `GET /ping` from a running server.
///
/// Exits with code 0 if healthy, 1 otherwise.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let (mut reader, mut writer) = stream.into_split();

    let request = format!("GET /ping HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if response.contains("200 OK") && response.contains("\"pong\"") {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle --health-check flag for Docker HEALTHCHECK.
    if std::env::args().any(|a| a == "--health-check") {
        let config = BucketStoreConfig::from_env();
        let addr = config.gateway_listen.replace("0.0.0.0", "127.0.0.1");
        let healthy = run_health_check(&addr).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    let config = BucketStoreConfig::from_env();

    init_tracing(&config.log_level)?;

    info!(
        gateway_listen = %config.gateway_listen,
        default_region = %config.default_region,
        settings_path = %config.settings_path,
        s3_endpoint_url = config.s3_endpoint_url.as_deref().unwrap_or("aws"),
        version = VERSION,
        "starting Bucket Store Server",
    );

    let settings = Arc::new(JsonFileSettingsStore::new(&config.settings_path));
    let provider = build_provider(&config, settings);
    provider
        .init_from_settings()
        .await
        .with_context(|| format!("failed to load settings from {}", config.settings_path))?;
    if !provider.registry().is_configured() {
        warn!("no AWS credentials stored yet; POST /settings/aws/key and /settings/aws/secret");
    }

    let handler = BucketStoreApiHandler::new(Arc::new(provider));
    let service = BucketStoreHttpService::new(Arc::new(handler), BucketStoreHttpConfig::default());

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, "listening for connections");

    serve(listener, service).await
}
