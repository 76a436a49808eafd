//! Client SDK for the action endpoint
//!
//! One async method per action. Each method builds an [`Action`], posts it as
//! `{action, payload}` and unwraps `data` from the answer. There is no retry,
//! caching or concurrency control here.
//!
//! ```rust,no_run
//! use atelier::client::StudioClient;
//!
//! # async fn run() -> Result<(), atelier::error::AtelierError> {
//! let client = StudioClient::builder()
//!     .endpoint("http://127.0.0.1:3000/api/gemini")
//!     .build()?;
//! let urls = client.generate_image("a lighthouse at dusk", 2, "16:9").await?;
//! # Ok(())
//! # }
//! ```

mod actions;

use std::path::Path;
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use crate::error::{AtelierError, Result};
use crate::types::{Action, DataEnvelope, ErrorEnvelope, SerializableImage};

pub use actions::{DETAILED_BRIEF_TEMPLATE, VoiceDesign, color_palette_schema};

/// Default endpoint when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3000/api/gemini";

/// Message used when an error response carries no `error` text.
pub const UNKNOWN_API_ERROR: &str = "An unknown API error occurred.";

/// Replacement for any server message about the missing credential.
pub const MISSING_KEY_HELP: &str = "the API key for the AI service has not been configured. \
     The site administrator must add it in the deployment settings for the application to work.";

const MISSING_KEY_MARKER: &str = "API_KEY is not configured";

/// Read a file and encode it for transport.
pub async fn file_to_serializable(path: impl AsRef<Path>) -> Result<SerializableImage> {
    SerializableImage::from_file(path).await
}

/// HTTP client for the dispatcher endpoint.
#[derive(Debug, Clone)]
pub struct StudioClient {
    http_client: HttpClient,
    endpoint: String,
}

impl StudioClient {
    pub fn builder() -> StudioClientBuilder {
        StudioClientBuilder::default()
    }

    /// Client for `endpoint` with a default HTTP client.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::builder().endpoint(endpoint).build()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post an action and deserialize the `data` of the answer.
    ///
    /// Errors mentioning the missing server credential are replaced by a
    /// configuration error meant for end users.
    pub async fn call_api<T>(&self, action: &Action) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send(action).await.map_err(|err| {
            tracing::error!(action = %action.kind(), error = %err, "API call failed");
            rewrite_missing_key(err)
        })
    }

    async fn send<T>(&self, action: &Action) -> Result<T>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(action = %action.kind(), endpoint = %self.endpoint, "calling API");
        let resp = self
            .http_client
            .post(&self.endpoint)
            .json(action)
            .send()
            .await
            .map_err(|e| AtelierError::HttpError(format!("Request to {} failed: {e}", self.endpoint)))?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let envelope: ErrorEnvelope = serde_json::from_str(&text).unwrap_or_default();
            return Err(AtelierError::RemoteError {
                status: status.as_u16(),
                message: envelope
                    .error
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| UNKNOWN_API_ERROR.to_string()),
                details: envelope.details,
            });
        }

        let envelope: DataEnvelope<T> = serde_json::from_str(&text).map_err(|e| {
            AtelierError::parse_with_raw(format!("Unexpected response from API: {e}"), text.clone())
        })?;
        Ok(envelope.data)
    }
}

fn rewrite_missing_key(err: AtelierError) -> AtelierError {
    if err.to_string().contains(MISSING_KEY_MARKER) {
        AtelierError::ConfigurationError(MISSING_KEY_HELP.to_string())
    } else {
        err
    }
}

/// Builder for [`StudioClient`].
#[derive(Debug, Default)]
pub struct StudioClientBuilder {
    endpoint: Option<String>,
    http_client: Option<HttpClient>,
    timeout: Option<Duration>,
}

impl StudioClientBuilder {
    /// Full URL of the action endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Use an existing HTTP client.
    pub fn http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Request timeout; ignored when a custom HTTP client is supplied.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<StudioClient> {
        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = HttpClient::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build().map_err(|e| {
                    AtelierError::ConfigurationError(format!("Failed to create HTTP client: {e}"))
                })?
            }
        };

        Ok(StudioClient {
            http_client,
            endpoint: self.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        })
    }
}
