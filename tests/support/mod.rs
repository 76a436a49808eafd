//! Shared test helpers: a scripted, recording `GenerativeProvider`.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use atelier::error::AtelierError;
use atelier::traits::{
    GeneratedImage, GenerativeProvider, ImageGenerationRequest, MultimodalRequest, ResponsePart,
};
use atelier::types::{SerializableImage, StructuredSchema};

/// One recorded provider call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Text(String),
    Structured {
        prompt: String,
        schema: StructuredSchema,
    },
    Multimodal(MultimodalRequest),
    Edit {
        prompt: String,
        image: SerializableImage,
    },
    Images(ImageGenerationRequest),
}

#[derive(Default)]
struct Script {
    texts: VecDeque<Result<String, AtelierError>>,
    image_batches: VecDeque<Result<Vec<GeneratedImage>, AtelierError>>,
    edit_parts: VecDeque<Result<Vec<ResponsePart>, AtelierError>>,
    calls: Vec<Call>,
}

/// Provider that answers from a script and records every call.
///
/// Text-returning calls (text, structured, multimodal) share one queue.
/// An exhausted image queue answers with no images.
#[derive(Default)]
pub struct MockProvider {
    script: Mutex<Script>,
}

impl MockProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_text(&self, text: &str) -> &Self {
        self.script.lock().unwrap().texts.push_back(Ok(text.to_string()));
        self
    }

    pub fn push_text_error(&self, err: AtelierError) -> &Self {
        self.script.lock().unwrap().texts.push_back(Err(err));
        self
    }

    /// Queue one batch of generated images, given as base64 payloads.
    pub fn push_images(&self, payloads: &[&str]) -> &Self {
        let batch = payloads
            .iter()
            .map(|p| GeneratedImage {
                bytes_base64: p.to_string(),
                mime_type: "image/jpeg".to_string(),
            })
            .collect();
        self.script.lock().unwrap().image_batches.push_back(Ok(batch));
        self
    }

    pub fn push_edit_parts(&self, parts: Vec<ResponsePart>) -> &Self {
        self.script.lock().unwrap().edit_parts.push_back(Ok(parts));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.script.lock().unwrap().calls.len()
    }

    pub fn image_requests(&self) -> Vec<ImageGenerationRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Images(req) => Some(req),
                _ => None,
            })
            .collect()
    }

    pub fn multimodal_requests(&self) -> Vec<MultimodalRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Multimodal(req) => Some(req),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.script.lock().unwrap().calls.push(call);
    }

    fn next_text(&self) -> Result<String, AtelierError> {
        self.script
            .lock()
            .unwrap()
            .texts
            .pop_front()
            .unwrap_or_else(|| Err(AtelierError::HttpError("no scripted text".into())))
    }
}

#[async_trait]
impl GenerativeProvider for MockProvider {
    fn provider_id(&self) -> &str {
        "mock"
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, AtelierError> {
        self.record(Call::Text(prompt.to_string()));
        self.next_text()
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &StructuredSchema,
    ) -> Result<String, AtelierError> {
        self.record(Call::Structured {
            prompt: prompt.to_string(),
            schema: schema.clone(),
        });
        self.next_text()
    }

    async fn generate_multimodal(
        &self,
        request: MultimodalRequest,
    ) -> Result<String, AtelierError> {
        self.record(Call::Multimodal(request));
        self.next_text()
    }

    async fn edit_image(
        &self,
        prompt: &str,
        image: &SerializableImage,
    ) -> Result<Vec<ResponsePart>, AtelierError> {
        self.record(Call::Edit {
            prompt: prompt.to_string(),
            image: image.clone(),
        });
        self.script
            .lock()
            .unwrap()
            .edit_parts
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn generate_images(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<Vec<GeneratedImage>, AtelierError> {
        self.record(Call::Images(request));
        self.script
            .lock()
            .unwrap()
            .image_batches
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// A tiny PNG-tagged image payload.
pub fn sample_image() -> SerializableImage {
    SerializableImage::new("iVBORw0KGgo=", "image/png")
}
