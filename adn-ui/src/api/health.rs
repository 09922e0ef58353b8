//! Health check endpoint

use adn_common::api::HealthResponse;
use axum::{routing::get, Json, Router};

use crate::{AppState, MODULE_NAME};

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok(MODULE_NAME, env!("CARGO_PKG_VERSION")))
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
