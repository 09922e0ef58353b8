//! adn-ds library - Denoise Service
//!
//! Accepts one audio file per request and returns a noise-reduced WAV.
//! Stateless: every buffer lives for a single request.

use axum::Router;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod audio;
pub mod error;
pub mod pipeline;
pub mod server;

pub use crate::error::{ApiError, ApiResult, AudioError};

/// Module name reported by `/health`
pub const MODULE_NAME: &str = "adn-ds";

/// Application state shared across HTTP handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Largest accepted `/denoise` request body
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(max_upload_bytes: usize) -> Self {
        Self { max_upload_bytes }
    }
}

/// Build application router
///
/// - `GET /` readiness message
/// - `GET /health` health check
/// - `POST /denoise` noise reduction
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::denoise_routes(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
