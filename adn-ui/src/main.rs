//! adn-ui (Upload UI) - entry point
//!
//! Serves the upload page (default 127.0.0.1:8501). Unless a service URL or
//! `--no-embedded-service` is given, the Denoise Service runs as a background
//! task on its own port and is reached only over HTTP.

use std::path::PathBuf;
use std::time::Duration;

use adn_common::config::TomlConfig;
use adn_ui::{build_router, resolve_service, AppState, DenoiseClient, ServiceLaunch};
use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// `/health` attempts before the UI gives up waiting for the service
const READY_ATTEMPTS: u32 = 20;
const READY_DELAY: Duration = Duration::from_millis(250);

/// Command-line arguments for adn-ui
#[derive(Parser, Debug)]
#[command(name = "adn-ui")]
#[command(about = "Audio denoiser upload page")]
#[command(version)]
struct Args {
    /// Host to bind
    #[arg(long, env = "ADN_UI_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "ADN_UI_PORT")]
    port: Option<u16>,

    /// Directory for the denoised output file
    #[arg(short, long, env = "ADN_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Denoise Service base URL; setting it skips the embedded service
    #[arg(long, env = "ADN_SERVICE_URL")]
    service_url: Option<String>,

    /// Do not start the Denoise Service in this process; use the service
    /// host and port instead
    #[arg(long)]
    no_embedded_service: bool,

    /// Embedded service host
    #[arg(long, env = "ADN_DS_HOST")]
    service_host: Option<String>,

    /// Embedded service port
    #[arg(long, env = "ADN_DS_PORT")]
    service_port: Option<u16>,

    /// Largest accepted upload in bytes, for both the page and the service
    #[arg(long, env = "ADN_MAX_UPLOAD_BYTES")]
    max_upload_bytes: Option<usize>,

    /// Timeout for the denoise call in seconds (0 = none)
    #[arg(long, env = "ADN_REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: Option<u64>,

    /// TOML config file
    #[arg(short, long, env = "ADN_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = TomlConfig::load_or_default(args.config.as_deref());

    adn_common::logging::init_tracing(&config.logging.level);

    info!(
        "Starting Audio Denoiser upload UI (adn-ui) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    if let Some(host) = args.service_host {
        config.service.host = host;
    }
    if let Some(port) = args.service_port {
        config.service.port = port;
    }
    if let Some(limit) = args.max_upload_bytes {
        config.service.max_upload_bytes = limit;
    }

    let host = args.host.unwrap_or(config.ui.host);
    let port = args.port.unwrap_or(config.ui.port);
    let output_dir = args.output_dir.unwrap_or(config.ui.output_dir);
    let timeout_secs = args
        .request_timeout_secs
        .unwrap_or(config.ui.request_timeout_secs);
    let max_upload_bytes = config.service.max_upload_bytes;

    let launch = resolve_service(
        args.service_url.or(config.ui.service_url),
        args.no_embedded_service,
        config.service.base_url(),
    );

    let (service_url, embedded) = match launch {
        ServiceLaunch::External(url) => {
            info!("Using external denoise service at {}", url);
            (url, None)
        }
        ServiceLaunch::Embedded => {
            let (addr, handle) = adn_ds::server::spawn(
                &config.service.host,
                config.service.port,
                adn_ds::AppState::new(max_upload_bytes),
            )
            .await
            .with_context(|| {
                format!(
                    "Failed to start embedded denoise service on {}:{}",
                    config.service.host, config.service.port
                )
            })?;
            (format!("http://{addr}"), Some(handle))
        }
    };

    let timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));
    let client = DenoiseClient::new(service_url, timeout).context("Failed to build HTTP client")?;

    if !client.wait_until_ready(READY_ATTEMPTS, READY_DELAY).await {
        warn!("Continuing without a reachable denoise service; uploads will fail until it is up");
    }

    info!("Output directory: {}", output_dir.display());

    let app = build_router(AppState::new(client, output_dir, max_upload_bytes));

    let listener = TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    let addr = listener.local_addr()?;
    info!("adn-ui listening on http://{}", addr);
    info!("Open http://{} in a browser", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(adn_ds::server::shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(handle) = embedded {
        handle.abort();
    }

    info!("Server shutdown complete");
    Ok(())
}
