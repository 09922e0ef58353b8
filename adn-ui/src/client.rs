//! HTTP client for the Denoise Service
//!
//! The UI and the service share nothing but this loopback HTTP interface.

use std::path::{Path, PathBuf};
use std::time::Duration;

use adn_common::api::HealthResponse;
use reqwest::multipart::{Form, Part};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Declared type of the forwarded upload part
pub const UPLOAD_MIME: &str = "audio/wav";

/// Service call failure before any HTTP status was received
#[derive(Debug, Error)]
pub enum ClientError {
    /// Temp input file could not be read
    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Connection refused/reset, timeout, invalid response
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Answer from `POST /denoise`
#[derive(Debug)]
pub enum DenoiseOutcome {
    /// 200 with WAV bytes
    Completed(Vec<u8>),
    /// Any other status, with the body text verbatim
    Rejected { status: u16, text: String },
}

/// Denoise Service client
#[derive(Clone, Debug)]
pub struct DenoiseClient {
    http: reqwest::Client,
    base_url: String,
}

impl DenoiseClient {
    /// `timeout` of `None` waits indefinitely for the service
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /health
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// Poll `/health` until it answers or `attempts` run out
    pub async fn wait_until_ready(&self, attempts: u32, delay: Duration) -> bool {
        for attempt in 1..=attempts {
            match self.health().await {
                Ok(health) => {
                    info!(
                        "Denoise service ready at {} ({} v{})",
                        self.base_url, health.module, health.version
                    );
                    return true;
                }
                Err(e) => {
                    debug!(attempt, "Denoise service not ready: {}", e);
                    tokio::time::sleep(delay).await;
                }
            }
        }

        warn!(
            "Denoise service at {} did not answer after {} attempts",
            self.base_url, attempts
        );
        false
    }

    /// POST the file at `path` as multipart field `file`
    pub async fn denoise_file(&self, path: &Path) -> Result<DenoiseOutcome, ClientError> {
        let data = tokio::fs::read(path).await.map_err(|source| ClientError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.wav")
            .to_string();
        debug!(bytes = data.len(), file_name = %file_name, "Sending file to denoise service");

        // The service sniffs the real format; the declared type is only a label
        let part = Part::bytes(data).file_name(file_name).mime_str(UPLOAD_MIME)?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/denoise", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::OK {
            Ok(DenoiseOutcome::Completed(response.bytes().await?.to_vec()))
        } else {
            Ok(DenoiseOutcome::Rejected {
                status: status.as_u16(),
                text: response.text().await?,
            })
        }
    }
}
