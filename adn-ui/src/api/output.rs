//! Denoised output routes
//!
//! Both routes serve the same fixed-name file; only the disposition differs.

use adn_common::config::CompiledDefaults;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Inline playback path
pub const PLAY_PATH: &str = "/output/denoised_output.wav";

/// Attachment download path
pub const DOWNLOAD_PATH: &str = "/output/download";

/// GET /output/denoised_output.wav
pub async fn play_output(State(state): State<AppState>) -> ApiResult<Response> {
    let data = read_output(&state).await?;
    Ok(([(header::CONTENT_TYPE, "audio/wav")], data).into_response())
}

/// GET /output/download
pub async fn download_output(State(state): State<AppState>) -> ApiResult<Response> {
    let data = read_output(&state).await?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        CompiledDefaults::DOWNLOAD_FILE_NAME
    );
    Ok((
        [
            (header::CONTENT_TYPE, "audio/wav".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    )
        .into_response())
}

async fn read_output(state: &AppState) -> ApiResult<Vec<u8>> {
    match tokio::fs::read(state.output_path()).await {
        Ok(data) => Ok(data),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ApiError::NotFound(
            "No denoised audio available yet".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

pub fn output_routes() -> Router<AppState> {
    Router::new()
        .route(PLAY_PATH, get(play_output))
        .route(DOWNLOAD_PATH, get(download_output))
}
