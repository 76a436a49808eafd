//! # Atelier - Action Dispatcher for Generative Design Tools
//!
//! Atelier mediates between design tools and a generative-AI provider. A tool
//! sends one `{action, payload}` request; the dispatcher shapes the provider
//! call(s), reshapes the answer and returns `{data}` or `{error}`.
//!
#![deny(unsafe_code)]

//! ## Layers
//!
//! - **Dispatcher**: validates requests and runs one or two provider calls per action.
//! - **Provider**: the [`GenerativeProvider`](traits::GenerativeProvider) capability trait, implemented for Gemini/Imagen.
//! - **Server adapter**: an axum router exposing the dispatcher on one POST route.
//! - **Client SDK**: one async method per action on [`StudioClient`](client::StudioClient).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use atelier::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GeminiBuilder::new().api_key("your-api-key").build()?;
//!     let dispatcher = Dispatcher::new(Arc::new(client));
//!
//!     let action = Action::GenerateImage(GenerateImagePayload::new("a paper crane"));
//!     let output = dispatcher.dispatch(action).await?;
//!     println!("{}", serde_json::to_string(&output)?);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod providers;
pub mod server_adapters;
pub mod speech;
pub mod telemetry;
pub mod traits;
pub mod types;
pub mod utils;

/// Media type of every generated image returned by the dispatcher.
pub const IMAGE_OUTPUT_MIME_TYPE: &str = "image/jpeg";

pub use error::{AtelierError, Result};

pub mod prelude {
    pub use crate::client::{StudioClient, file_to_serializable};
    pub use crate::dispatcher::Dispatcher;
    pub use crate::error::{AtelierError, Result};
    #[cfg(feature = "gemini")]
    pub use crate::providers::gemini::{GeminiBuilder, GeminiClient, GeminiConfig};
    pub use crate::speech::{SpeechRecognizer, UnsupportedSpeechRecognizer};
    pub use crate::traits::{
        GeneratedImage, GenerativeProvider, ImageGenerationRequest, MultimodalRequest,
        ResponseFormat, ResponsePart,
    };
    pub use crate::types::*;
}
