//! adn-ds (Denoise Service) - standalone entry point
//!
//! Serves `GET /`, `GET /health` and `POST /denoise` on a loopback port
//! (default 127.0.0.1:5000). adn-ui normally embeds this service; running
//! it on its own is for deployments where the UI talks to a separate process.

use std::path::PathBuf;

use adn_common::config::TomlConfig;
use adn_ds::{server, AppState};
use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

/// Command-line arguments for adn-ds
#[derive(Parser, Debug)]
#[command(name = "adn-ds")]
#[command(about = "Audio denoising HTTP service")]
#[command(version)]
struct Args {
    /// Host to bind
    #[arg(long, env = "ADN_DS_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "ADN_DS_PORT")]
    port: Option<u16>,

    /// Largest accepted upload in bytes
    #[arg(long, env = "ADN_MAX_UPLOAD_BYTES")]
    max_upload_bytes: Option<usize>,

    /// TOML config file
    #[arg(short, long, env = "ADN_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = TomlConfig::load_or_default(args.config.as_deref());

    adn_common::logging::init_tracing(&config.logging.level);

    info!(
        "Starting Audio Denoiser service (adn-ds) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let host = args.host.unwrap_or(config.service.host);
    let port = args.port.unwrap_or(config.service.port);
    let max_upload_bytes = args
        .max_upload_bytes
        .unwrap_or(config.service.max_upload_bytes);

    info!("Upload limit: {} bytes", max_upload_bytes);

    let listener = TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;

    server::run(listener, AppState::new(max_upload_bytes), server::shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}
