//! POST /denoise
//!
//! Multipart upload with one `file` field in, `audio/wav` out.

use axum::{
    extract::{
        multipart::{Multipart, MultipartError, MultipartRejection},
        DefaultBodyLimit,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use tracing::debug;

use crate::audio::UploadedAudio;
use crate::error::{ApiError, ApiResult};
use crate::{pipeline, AppState};

/// Multipart field carrying the audio
pub const FILE_FIELD: &str = "file";

/// POST /denoise
///
/// A request that is not multipart at all is treated like one without a
/// `file` field.
pub async fn denoise(multipart: Result<Multipart, MultipartRejection>) -> ApiResult<Response> {
    let mut multipart = multipart.map_err(|rejection| {
        debug!("Request is not multipart: {}", rejection);
        ApiError::MissingFile
    })?;

    let upload = read_file_field(&mut multipart)
        .await?
        .ok_or(ApiError::MissingFile)?;

    debug!(
        bytes = upload.data.len(),
        file_name = upload.file_name.as_deref().unwrap_or("-"),
        content_type = upload.content_type.as_deref().unwrap_or("-"),
        "Received upload"
    );

    let wav = tokio::task::spawn_blocking(move || pipeline::denoise_upload(upload))
        .await
        .map_err(|e| ApiError::Internal(format!("denoise worker failed: {e}")))??;

    debug!(
        sample_rate = wav.sample_rate,
        channels = wav.channels,
        frames = wav.frames,
        bytes = wav.bytes.len(),
        "Returning denoised WAV"
    );

    Ok(([(header::CONTENT_TYPE, "audio/wav")], wav.bytes).into_response())
}

/// First file part named `file`; other fields are ignored
async fn read_file_field(multipart: &mut Multipart) -> ApiResult<Option<UploadedAudio>> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        // Plain text fields named `file` are not uploads
        if field.name() != Some(FILE_FIELD) || field.file_name().is_none() {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?.to_vec();

        return Ok(Some(UploadedAudio {
            data,
            file_name,
            content_type,
        }));
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

/// Build denoise route with its body limit
pub fn denoise_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/denoise", post(denoise))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
