//! Capability traits

pub mod generation;

pub use generation::{
    GenerativeProvider, GeneratedImage, ImageGenerationRequest, MultimodalRequest, ResponseFormat,
    ResponsePart,
};
