//! Gemini Client Implementation
//!
//! Implements [`GenerativeProvider`] over the Gemini `generateContent` endpoint
//! and the Imagen `predict` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::headers::build_gemini_headers;
use super::types::{
    Content, GeminiConfig, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    ImagenInstance, ImagenOutputOptions, ImagenParameters, PredictRequest, PredictResponse,
};
use crate::error::AtelierError;
use crate::traits::{
    GeneratedImage, GenerativeProvider, ImageGenerationRequest, MultimodalRequest, ResponseFormat,
    ResponsePart,
};
use crate::types::{SerializableImage, StructuredSchema};

const PROVIDER_ID: &str = "gemini";

/// Gemini client that implements the `GenerativeProvider` trait
#[derive(Clone)]
pub struct GeminiClient {
    /// HTTP client for making requests
    http_client: HttpClient,
    /// Gemini configuration
    config: GeminiConfig,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a new Gemini client with the given configuration
    pub fn new(config: GeminiConfig) -> Result<Self, AtelierError> {
        let mut builder = HttpClient::builder();
        if let Some(secs) = config.timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build().map_err(|e| {
            AtelierError::ConfigurationError(format!("Failed to create HTTP client: {e}"))
        })?;

        Self::with_http_client(config, http_client)
    }

    /// Create a new Gemini client with a custom HTTP client
    pub fn with_http_client(
        config: GeminiConfig,
        http_client: HttpClient,
    ) -> Result<Self, AtelierError> {
        if !config.has_api_key() {
            return Err(AtelierError::missing_api_key());
        }
        Ok(Self {
            http_client,
            config,
        })
    }

    /// Create a new Gemini client with API key
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, AtelierError> {
        Self::new(GeminiConfig::new(api_key))
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.base_url.trim_end_matches('/'),
            model,
            method
        )
    }

    async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R, AtelierError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let headers = build_gemini_headers(
            self.config.api_key.expose_secret(),
            &self.config.custom_headers,
        )?;

        tracing::debug!(provider = PROVIDER_ID, %url, "sending provider request");
        let resp = self
            .http_client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| AtelierError::HttpError(format!("Gemini request failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| AtelierError::HttpError(format!("Failed to read Gemini response: {e}")))?;
        tracing::debug!(provider = PROVIDER_ID, status = status.as_u16(), "provider responded");

        if !status.is_success() {
            return Err(classify_gemini_http_error(status.as_u16(), &text));
        }

        serde_json::from_str(&text).map_err(|e| AtelierError::ApiError {
            code: status.as_u16(),
            message: format!("Failed to decode Gemini response: {e}"),
            details: Some(serde_json::json!({ "provider": PROVIDER_ID, "raw": text })),
        })
    }

    async fn generate_content(
        &self,
        model: &str,
        prompt: &str,
        images: &[SerializableImage],
        generation_config: Option<GenerationConfig>,
    ) -> Result<GenerateContentResponse, AtelierError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(prompt, images)],
            generation_config,
        };
        let url = self.model_url(model, "generateContent");
        self.post_json(&url, &request).await
    }

    async fn generate_content_text(
        &self,
        prompt: &str,
        images: &[SerializableImage],
        generation_config: Option<GenerationConfig>,
    ) -> Result<String, AtelierError> {
        let resp = self
            .generate_content(&self.config.text_model, prompt, images, generation_config)
            .await?;
        resp.text().ok_or_else(|| no_candidates_error(&resp))
    }
}

/// Map a non-success Gemini response to an API error.
///
/// Gemini returns `{ "error": { "code": 400, "message": "...", "status": "INVALID_ARGUMENT" } }`.
pub fn classify_gemini_http_error(status: u16, body_text: &str) -> AtelierError {
    let json: Option<Value> = serde_json::from_str(body_text).ok();
    let error_obj = json.as_ref().and_then(|j| j.get("error"));

    let message = error_obj
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| {
            if body_text.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                body_text.to_string()
            }
        });
    let label = error_obj
        .and_then(|e| e.get("status"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string());

    AtelierError::ApiError {
        code: status,
        message: format!("Gemini API error ({label}): {message}"),
        details: json,
    }
}

fn no_candidates_error(resp: &GenerateContentResponse) -> AtelierError {
    let message = match resp.block_reason() {
        Some(reason) => format!("Gemini returned no candidates (prompt blocked: {reason})"),
        None => "Gemini returned no candidates".to_string(),
    };
    AtelierError::ApiError {
        code: 500,
        message,
        details: None,
    }
}

#[async_trait]
impl GenerativeProvider for GeminiClient {
    fn provider_id(&self) -> &str {
        PROVIDER_ID
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, AtelierError> {
        self.generate_content_text(prompt, &[], None).await
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &StructuredSchema,
    ) -> Result<String, AtelierError> {
        self.generate_content_text(prompt, &[], Some(GenerationConfig::json_schema(schema.clone())))
            .await
    }

    async fn generate_multimodal(
        &self,
        request: MultimodalRequest,
    ) -> Result<String, AtelierError> {
        let generation_config = match request.response_format {
            ResponseFormat::Text => None,
            ResponseFormat::Json => Some(GenerationConfig::json()),
            ResponseFormat::Schema(schema) => Some(GenerationConfig::json_schema(schema)),
        };
        self.generate_content_text(&request.prompt, &request.images, generation_config)
            .await
    }

    async fn edit_image(
        &self,
        prompt: &str,
        image: &SerializableImage,
    ) -> Result<Vec<ResponsePart>, AtelierError> {
        let generation_config = GenerationConfig::new().with_response_modalities(&["IMAGE", "TEXT"]);
        let resp = self
            .generate_content(
                &self.config.image_edit_model,
                prompt,
                std::slice::from_ref(image),
                Some(generation_config),
            )
            .await?;

        let parts = resp.parts().ok_or_else(|| no_candidates_error(&resp))?;
        Ok(parts
            .iter()
            .filter(|p| !p.thought.unwrap_or(false))
            .filter_map(|p| {
                if let Some(blob) = &p.inline_data {
                    Some(ResponsePart::InlineData {
                        mime_type: blob.mime_type.clone(),
                        data: blob.data.clone(),
                    })
                } else {
                    p.text.clone().map(ResponsePart::Text)
                }
            })
            .collect())
    }

    async fn generate_images(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<Vec<GeneratedImage>, AtelierError> {
        let body = PredictRequest {
            instances: vec![ImagenInstance {
                prompt: request.prompt,
            }],
            parameters: ImagenParameters {
                sample_count: request.count,
                aspect_ratio: request.aspect_ratio,
                output_options: Some(ImagenOutputOptions {
                    mime_type: request.output_mime_type.clone(),
                }),
            },
        };
        let url = self.model_url(&self.config.image_model, "predict");
        let resp: PredictResponse = self.post_json(&url, &body).await?;

        let filtered = resp
            .predictions
            .iter()
            .filter(|p| p.bytes_base64_encoded.is_none())
            .count();
        if filtered > 0 {
            tracing::warn!(provider = PROVIDER_ID, filtered, "some predictions were filtered");
        }

        Ok(resp
            .predictions
            .into_iter()
            .filter_map(|p| {
                p.bytes_base64_encoded.map(|bytes| GeneratedImage {
                    bytes_base64: bytes,
                    mime_type: p
                        .mime_type
                        .unwrap_or_else(|| request.output_mime_type.clone()),
                })
            })
            .collect())
    }
}
