//! adn-ui library - Upload UI
//!
//! Serves the upload page, forwards each upload to the Denoise Service over
//! HTTP and keeps the latest result in a fixed-name output file.

use std::path::PathBuf;

use adn_common::config::CompiledDefaults;
use axum::Router;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod client;
pub mod error;
pub mod launch;

pub use crate::client::{ClientError, DenoiseClient, DenoiseOutcome};
pub use crate::error::{ApiError, ApiResult};
pub use crate::launch::{resolve_service, ServiceLaunch};

/// Module name reported by `/health`
pub const MODULE_NAME: &str = "adn-ui";

/// Application state shared across HTTP handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Denoise Service client
    pub client: DenoiseClient,
    /// Directory holding the denoised output file
    pub output_dir: PathBuf,
    /// Directory for per-run temp input files
    pub temp_dir: PathBuf,
    /// Largest accepted browser upload
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(client: DenoiseClient, output_dir: PathBuf, max_upload_bytes: usize) -> Self {
        Self {
            client,
            output_dir,
            temp_dir: std::env::temp_dir(),
            max_upload_bytes,
        }
    }

    /// Use `temp_dir` instead of the system temp directory
    pub fn with_temp_dir(mut self, temp_dir: PathBuf) -> Self {
        self.temp_dir = temp_dir;
        self
    }

    /// Fixed path of the denoised output, overwritten by every run
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(CompiledDefaults::OUTPUT_FILE_NAME)
    }
}

/// Build application router
///
/// - `GET /` upload page
/// - `GET /static/app.js` page script
/// - `GET /health` health check
/// - `POST /api/denoise` upload, forward and save
/// - `GET /output/denoised_output.wav` inline playback
/// - `GET /output/download` attachment download
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::ui_routes())
        .merge(api::health_routes())
        .merge(api::denoise_routes(state.max_upload_bytes))
        .merge(api::output_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
