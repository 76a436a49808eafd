//! Gemini client builder

use super::client::GeminiClient;
use super::types::GeminiConfig;
use crate::error::AtelierError;

/// Environment variable holding the provider credential.
pub const API_KEY_ENV: &str = "API_KEY";
/// Secondary credential variable, checked when `API_KEY` is unset.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Optional base URL override.
pub const GEMINI_BASE_URL_ENV: &str = "GEMINI_BASE_URL";

/// Builder for [`GeminiClient`].
///
/// Values set explicitly win over environment variables.
#[derive(Debug, Clone, Default)]
pub struct GeminiBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    text_model: Option<String>,
    image_edit_model: Option<String>,
    image_model: Option<String>,
    timeout: Option<u64>,
    headers: Vec<(String, String)>,
}

impl GeminiBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the text/multimodal model
    pub fn text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = Some(model.into());
        self
    }

    /// Set the image editing model
    pub fn image_edit_model(mut self, model: impl Into<String>) -> Self {
        self.image_edit_model = Some(model.into());
        self
    }

    /// Set the text-to-image model
    pub fn image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = Some(model.into());
        self
    }

    /// Set HTTP timeout in seconds
    pub const fn timeout(mut self, secs: u64) -> Self {
        self.timeout = Some(secs);
        self
    }

    /// Add a header sent with every request
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Resolve the configuration without building a client.
    ///
    /// Key priority: explicit value > `API_KEY` > `GEMINI_API_KEY`.
    pub fn build_config(self) -> Result<GeminiConfig, AtelierError> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .or_else(|| std::env::var(GEMINI_API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(AtelierError::missing_api_key)?;

        let mut config = GeminiConfig::new(api_key);
        if let Some(base_url) = self
            .base_url
            .or_else(|| std::env::var(GEMINI_BASE_URL_ENV).ok())
        {
            config = config.with_base_url(base_url);
        }
        if let Some(model) = self.text_model {
            config = config.with_text_model(model);
        }
        if let Some(model) = self.image_edit_model {
            config = config.with_image_edit_model(model);
        }
        if let Some(model) = self.image_model {
            config = config.with_image_model(model);
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(secs);
        }
        for (name, value) in self.headers {
            config = config.with_header(name, value);
        }
        Ok(config)
    }

    /// Build the Gemini client
    pub fn build(self) -> Result<GeminiClient, AtelierError> {
        GeminiClient::new(self.build_config()?)
    }
}
