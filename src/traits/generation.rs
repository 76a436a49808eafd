//! Generative provider capability trait
//!
//! The dispatcher only talks to a provider through this trait. Each method is
//! one provider round trip; there is no retry or caching layer in between.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AtelierError;
use crate::types::{SerializableImage, StructuredSchema};

/// How the provider should format a multimodal answer.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResponseFormat {
    /// Free-form text.
    #[default]
    Text,
    /// JSON with no schema constraint.
    Json,
    /// JSON constrained by a schema.
    Schema(StructuredSchema),
}

/// A prompt accompanied by one or more inline images.
#[derive(Debug, Clone, PartialEq)]
pub struct MultimodalRequest {
    pub prompt: String,
    /// Sent before the prompt, in order.
    pub images: Vec<SerializableImage>,
    pub response_format: ResponseFormat,
}

impl MultimodalRequest {
    pub fn new(prompt: impl Into<String>, image: SerializableImage) -> Self {
        Self {
            prompt: prompt.into(),
            images: vec![image],
            response_format: ResponseFormat::Text,
        }
    }

    pub fn with_images(prompt: impl Into<String>, images: Vec<SerializableImage>) -> Self {
        Self {
            prompt: prompt.into(),
            images,
            response_format: ResponseFormat::Text,
        }
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = format;
        self
    }
}

/// Text-to-image request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageGenerationRequest {
    pub prompt: String,
    pub count: u32,
    pub aspect_ratio: String,
    pub output_mime_type: String,
}

impl ImageGenerationRequest {
    pub fn new(prompt: impl Into<String>, count: u32, aspect_ratio: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            count,
            aspect_ratio: aspect_ratio.into(),
            output_mime_type: crate::IMAGE_OUTPUT_MIME_TYPE.to_string(),
        }
    }
}

/// One generated image as base64 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub bytes_base64: String,
    pub mime_type: String,
}

/// A single part of an image-edit answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePart {
    Text(String),
    InlineData { mime_type: String, data: String },
}

#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Short identifier used in logs.
    fn provider_id(&self) -> &str;

    /// Unconstrained text completion.
    async fn generate_text(&self, prompt: &str) -> Result<String, AtelierError>;

    /// Completion constrained to JSON matching `schema`; returns the raw text.
    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &StructuredSchema,
    ) -> Result<String, AtelierError>;

    /// Image(s) + text completion; returns the raw text.
    async fn generate_multimodal(&self, request: MultimodalRequest)
    -> Result<String, AtelierError>;

    /// Ask for both image and text modalities back; returns every part in order.
    async fn edit_image(
        &self,
        prompt: &str,
        image: &SerializableImage,
    ) -> Result<Vec<ResponsePart>, AtelierError>;

    /// Text-to-image generation.
    async fn generate_images(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<Vec<GeneratedImage>, AtelierError>;
}
