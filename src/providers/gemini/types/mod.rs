//! Gemini API types (split by concern)

mod config;
mod generation;
mod imagen;

pub use config::{
    DEFAULT_BASE_URL, DEFAULT_IMAGE_EDIT_MODEL, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL,
    GeminiConfig,
};
pub use generation::{
    Blob, Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    Part, PromptFeedback,
};
pub use imagen::{
    ImagenInstance, ImagenOutputOptions, ImagenParameters, ImagenPrediction, PredictRequest,
    PredictResponse,
};
