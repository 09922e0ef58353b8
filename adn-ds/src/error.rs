//! Error types for adn-ds
//!
//! [`AudioError`] covers the decode → denoise → encode pipeline and splits
//! into bad-input and internal-fault variants. [`ApiError`] maps both onto
//! HTTP status codes with a `{"error": "..."}` body.

use adn_common::api::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

/// Message returned when the `file` field is absent
pub const MISSING_FILE_MESSAGE: &str = "No audio file uploaded";

/// Pipeline error
#[derive(Debug, Error)]
pub enum AudioError {
    /// Zero-byte upload
    #[error("uploaded file is empty")]
    EmptyUpload,

    /// Container or codec not recognised
    #[error("unsupported format: {0}")]
    Unsupported(String),

    /// Container holds no decodable audio track
    #[error("no audio track found")]
    NoAudioTrack,

    /// Stream could not be read or decoded
    #[error("corrupt audio stream: {0}")]
    Corrupt(String),

    /// Stream decoded but produced no frames
    #[error("audio stream contains no samples")]
    NoFrames,

    /// Noise-reduction transform failed
    #[error("noise reduction failed: {0}")]
    Transform(String),

    /// WAV encoding failed
    #[error("WAV encoding failed: {0}")]
    Encode(String),
}

impl AudioError {
    /// True when the caller's upload is at fault
    pub fn is_input_error(&self) -> bool {
        !matches!(self, AudioError::Transform(_) | AudioError::Encode(_))
    }
}

impl From<hound::Error> for AudioError {
    fn from(err: hound::Error) -> Self {
        AudioError::Encode(err.to_string())
    }
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// No `file` field in the request (400)
    #[error("{}", MISSING_FILE_MESSAGE)]
    MissingFile,

    /// Malformed multipart body (400)
    #[error("Invalid multipart request: {0}")]
    BadRequest(String),

    /// Body exceeds the configured upload limit (413)
    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    /// Upload is not decodable audio (422)
    #[error("Could not decode audio: {0}")]
    Undecodable(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<AudioError> for ApiError {
    fn from(err: AudioError) -> Self {
        if err.is_input_error() {
            ApiError::Undecodable(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFile | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Undecodable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            error!(status = status.as_u16(), "Denoise request failed: {}", message);
        } else {
            warn!(status = status.as_u16(), "Denoise request rejected: {}", message);
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
