//! Core types: wire requests, payloads, schemas and result shapes

pub mod action;
pub mod envelope;
pub mod image;
pub mod results;
pub mod schema;

pub use action::{
    Action, ActionKind, DEFAULT_ASPECT_RATIO, DEFAULT_IMAGE_COUNT, GenerateBrandKitPayload,
    GenerateImagePayload, GenerateMoodBoardPayload, GenerateSlideshowPayload,
    GenerateStoryboardPayload, GenerateStructuredTextPayload, GenerateTextPayload,
    GenerateTextWithImagePayload, PromptWithImagePayload,
};
pub use envelope::{DataEnvelope, ErrorEnvelope};
pub use image::{SerializableImage, data_url};
pub use results::{
    ActionOutput, BrandAnalysis, BrandColors, Color, EditedImage, KitData, MoodBoardData,
    OriginalityOutcome, OriginalityReport, RawResponse, Slide, SlideType, SlideshowData,
    Typography,
};
pub use schema::{SchemaType, StructuredSchema};
