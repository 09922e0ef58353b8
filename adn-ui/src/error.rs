//! Error types for adn-ui routes
//!
//! Every failure reaches the page as `{"error": "..."}`; the page shows the
//! text as-is.

use adn_common::api::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::client::ClientError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// No `file` field in the browser upload (400)
    #[error("No audio file uploaded")]
    MissingFile,

    /// Malformed multipart body (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Browser upload over the size limit (413)
    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    /// No denoised output yet (404)
    #[error("{0}")]
    NotFound(String),

    /// Service answered with a non-200 status (502)
    #[error("Error from server: {text}")]
    Upstream { status: u16, text: String },

    /// Service unreachable or the call failed (502)
    #[error("Something went wrong: {0}")]
    Client(#[from] ClientError),

    /// Local file I/O failed (500)
    #[error("Something went wrong: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFile | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream { .. } | ApiError::Client(_) => StatusCode::BAD_GATEWAY,
            ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = ErrorResponse::new(self.to_string());

        match &self {
            ApiError::Upstream { status: upstream, .. } => {
                warn!(upstream_status = upstream, "{}", body.error);
                body.upstream_status = Some(*upstream);
            }
            _ if status.is_server_error() => error!("{}", body.error),
            _ => warn!("{}", body.error),
        }

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
