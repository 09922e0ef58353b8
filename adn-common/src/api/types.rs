//! Shared API request/response types
//!
//! Used by both services:
//! - adn-ds (Denoise Service)
//! - adn-ui (Upload UI)

use serde::{Deserialize, Serialize};

/// Health check response
///
/// # Examples
///
/// ```
/// use adn_common::api::HealthResponse;
///
/// let health = HealthResponse::ok("adn-ds", "0.1.0");
/// assert_eq!(health.status, "ok");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

impl HealthResponse {
    pub fn ok(module: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            module: module.to_string(),
            version: version.to_string(),
        }
    }
}

/// Plain message body, e.g. the service readiness banner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

/// Error body returned by every failing route
///
/// Serialises as `{"error": "..."}`; `upstream_status` is only present when
/// the UI relays a non-success answer from the Denoise Service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            upstream_status: None,
        }
    }
}

/// Successful denoise run, as reported by the UI to the page script
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DenoiseResponse {
    pub status: String,
    pub message: String,
    /// Inline playback URL of the output file
    pub audio_url: String,
    /// Attachment download URL
    pub download_url: String,
    /// Size of the WAV returned by the service
    pub bytes: usize,
}
