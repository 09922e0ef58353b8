//! POST /api/denoise
//!
//! One run: store the browser upload in a temp file, send it to the Denoise
//! Service, save the answer as the fixed-name output file. The temp file is
//! removed on every path out of the handler.

use std::io::Write;
use std::path::Path;

use adn_common::api::DenoiseResponse;
use axum::{
    extract::{
        multipart::{Multipart, MultipartError, MultipartRejection},
        DefaultBodyLimit, State,
    },
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::client::DenoiseOutcome;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Multipart field carrying the audio
pub const FILE_FIELD: &str = "file";

/// Temp input file name prefix
pub const TEMP_PREFIX: &str = "adn-upload-";

/// Suffix used when the upload name has no usable extension
const DEFAULT_SUFFIX: &str = ".wav";

/// Browser upload, before it touches disk
struct BrowserUpload {
    file_name: Option<String>,
    data: Vec<u8>,
}

/// POST /api/denoise
pub async fn denoise(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<DenoiseResponse>> {
    let mut multipart = multipart.map_err(|rejection| {
        debug!("Request is not multipart: {}", rejection);
        ApiError::MissingFile
    })?;

    let upload = read_file_field(&mut multipart)
        .await?
        .ok_or(ApiError::MissingFile)?;

    info!(
        bytes = upload.data.len(),
        file_name = upload.file_name.as_deref().unwrap_or("-"),
        "Denoise run started"
    );

    let suffix = upload_suffix(upload.file_name.as_deref());
    let temp_dir = state.temp_dir.clone();
    let temp = tokio::task::spawn_blocking(move || write_temp_input(&temp_dir, &suffix, &upload.data))
        .await
        .map_err(|e| std::io::Error::other(format!("temp file worker failed: {e}")))??;

    debug!("Temp input at {}", temp.path().display());

    let outcome = state.client.denoise_file(temp.path()).await;

    let temp_path = temp.path().to_path_buf();
    if let Err(e) = temp.close() {
        warn!("Failed to remove temp input {}: {}", temp_path.display(), e);
    }

    let wav = match outcome? {
        DenoiseOutcome::Completed(bytes) => bytes,
        DenoiseOutcome::Rejected { status, text } => {
            return Err(ApiError::Upstream { status, text });
        }
    };

    let bytes = wav.len();
    let output_dir = state.output_dir.clone();
    let output_path = state.output_path();
    tokio::task::spawn_blocking(move || save_output(&output_dir, &output_path, &wav))
        .await
        .map_err(|e| std::io::Error::other(format!("output worker failed: {e}")))??;

    info!(bytes, "Denoising complete, saved {}", state.output_path().display());

    Ok(Json(DenoiseResponse {
        status: "ok".to_string(),
        message: "Denoising complete!".to_string(),
        audio_url: super::output::PLAY_PATH.to_string(),
        download_url: super::output::DOWNLOAD_PATH.to_string(),
        bytes,
    }))
}

/// First file part named `file`; other fields are ignored
async fn read_file_field(multipart: &mut Multipart) -> ApiResult<Option<BrowserUpload>> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        // Plain text fields named `file` are not uploads
        if field.name() != Some(FILE_FIELD) || field.file_name().is_none() {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?.to_vec();
        return Ok(Some(BrowserUpload { file_name, data }));
    }

    Ok(None)
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::BadRequest(err.body_text())
    }
}

/// Temp file suffix from the uploaded name, e.g. `.mp3`
///
/// Only short alphanumeric extensions are kept; anything else becomes `.wav`.
fn upload_suffix(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_else(|| DEFAULT_SUFFIX.to_string())
}

fn write_temp_input(dir: &Path, suffix: &str, data: &[u8]) -> std::io::Result<NamedTempFile> {
    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(suffix)
        .tempfile_in(dir)?;
    temp.write_all(data)?;
    temp.flush()?;
    Ok(temp)
}

/// Replace the output file atomically so a concurrent reader never sees a
/// partial WAV
fn save_output(dir: &Path, path: &Path, data: &[u8]) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let mut staged = tempfile::Builder::new()
        .prefix(".adn-output-")
        .tempfile_in(dir)?;
    staged.write_all(data)?;
    staged.flush()?;
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Build denoise route with its body limit
pub fn denoise_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/api/denoise", post(denoise))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
