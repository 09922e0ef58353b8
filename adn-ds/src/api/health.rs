//! Readiness and health endpoints

use adn_common::api::{HealthResponse, MessageResponse};
use axum::{routing::get, Json, Router};

use crate::{AppState, MODULE_NAME};

/// Banner served at `/`
pub const READY_MESSAGE: &str = "Audio Denoising Backend is running!";

/// GET /
pub async fn root_message() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: READY_MESSAGE.to_string(),
    })
}

/// GET /health
///
/// Polled by adn-ui before it accepts uploads.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok(MODULE_NAME, env!("CARGO_PKG_VERSION")))
}

/// Build readiness and health routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_message))
        .route("/health", get(health_check))
}
