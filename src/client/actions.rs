//! Typed wrappers, one per action, plus helpers built on top of them

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::StudioClient;
use crate::error::{AtelierError, Result};
use crate::speech::SpeechRecognizer;
use crate::types::{
    Action, Color, EditedImage, GenerateBrandKitPayload, GenerateImagePayload,
    GenerateMoodBoardPayload, GenerateSlideshowPayload, GenerateStoryboardPayload,
    GenerateStructuredTextPayload, GenerateTextPayload, GenerateTextWithImagePayload, KitData,
    MoodBoardData, OriginalityOutcome, PromptWithImagePayload, SerializableImage, SlideshowData,
    StructuredSchema,
};

/// Prompt used by [`StudioClient::generate_detailed_brief`]; `{idea}` is replaced.
pub const DETAILED_BRIEF_TEMPLATE: &str = "Act as a creative director. A designer has given you this initial idea: \"{idea}\".
Expand this into a detailed creative brief for an image generation AI.
The brief should be a single block of text, starting with the original idea and then expanding on it.
Include details about:
- A specific visual style (e.g., minimalist vector art, photorealistic, cinematic).
- A color palette.
- The mood and atmosphere.
- The composition and subject placement.
- Key elements to include.
Make the final text a rich, descriptive paragraph that will guide the AI to create a high-quality, specific image.";

const INVALID_PALETTE: &str = "Invalid response format from API for color palette.";

/// Schema for [`StudioClient::generate_color_palette`].
pub fn color_palette_schema() -> StructuredSchema {
    let color = StructuredSchema::object([
        (
            "name",
            StructuredSchema::string().with_description("The creative name of the color."),
        ),
        (
            "hex",
            StructuredSchema::string()
                .with_description("The hex code for the color (e.g., #RRGGBB)."),
        ),
    ])
    .with_required(["name", "hex"]);

    StructuredSchema::object([(
        "palette",
        StructuredSchema::array(color).with_description("An array of 5 color objects."),
    )])
    .with_required(["palette"])
}

/// Result of the voice design flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceDesign {
    pub transcript: String,
    /// Data URL of the generated image.
    pub image: String,
}

impl StudioClient {
    pub async fn generate_image(
        &self,
        prompt: impl Into<String>,
        number_of_images: u32,
        aspect_ratio: impl Into<String>,
    ) -> Result<Vec<String>> {
        let payload = GenerateImagePayload {
            prompt: prompt.into(),
            number_of_images,
            aspect_ratio: aspect_ratio.into(),
        };
        self.call_api(&Action::GenerateImage(payload)).await
    }

    pub async fn generate_storyboard(
        &self,
        scene_description: impl Into<String>,
    ) -> Result<Vec<String>> {
        let payload = GenerateStoryboardPayload {
            scene_description: scene_description.into(),
        };
        self.call_api(&Action::GenerateStoryboard(payload)).await
    }

    /// Schema-constrained completion, returned as parsed JSON.
    pub async fn generate_structured_text(
        &self,
        prompt: impl Into<String>,
        response_schema: StructuredSchema,
    ) -> Result<Value> {
        let payload = GenerateStructuredTextPayload {
            prompt: prompt.into(),
            response_schema,
        };
        self.call_api(&Action::GenerateStructuredText(payload)).await
    }

    pub async fn generate_text(&self, prompt: impl Into<String>) -> Result<String> {
        let payload = GenerateTextPayload {
            prompt: prompt.into(),
        };
        self.call_api(&Action::GenerateText(payload)).await
    }

    /// Expand a short idea into a detailed creative brief.
    pub async fn generate_detailed_brief(&self, idea: &str) -> Result<String> {
        self.generate_text(DETAILED_BRIEF_TEMPLATE.replace("{idea}", idea))
            .await
    }

    /// Text about an image. With `is_json` the answer is parsed JSON, or
    /// `{"rawResponse": ...}` when the provider's JSON was unparseable.
    pub async fn generate_text_with_image(
        &self,
        prompt: impl Into<String>,
        image: SerializableImage,
        is_json: bool,
    ) -> Result<Value> {
        let payload = GenerateTextWithImagePayload {
            prompt: prompt.into(),
            image,
            is_json,
        };
        self.call_api(&Action::GenerateTextWithImage(payload)).await
    }

    pub async fn edit_image(
        &self,
        prompt: impl Into<String>,
        image: SerializableImage,
    ) -> Result<EditedImage> {
        let payload = PromptWithImagePayload {
            prompt: prompt.into(),
            image,
        };
        self.call_api(&Action::EditImage(payload)).await
    }

    pub async fn analyze_originality(
        &self,
        prompt: impl Into<String>,
        image: SerializableImage,
    ) -> Result<OriginalityOutcome> {
        let payload = PromptWithImagePayload {
            prompt: prompt.into(),
            image,
        };
        self.call_api(&Action::AnalyzeOriginality(payload)).await
    }

    pub async fn generate_brand_kit(&self, image: SerializableImage) -> Result<KitData> {
        self.call_api(&Action::GenerateBrandKit(GenerateBrandKitPayload { image }))
            .await
    }

    pub async fn generate_mood_board(&self, theme: impl Into<String>) -> Result<MoodBoardData> {
        let payload = GenerateMoodBoardPayload {
            theme: theme.into(),
        };
        self.call_api(&Action::GenerateMoodBoard(payload)).await
    }

    pub async fn generate_slideshow(
        &self,
        images: Vec<SerializableImage>,
        title: impl Into<String>,
        points: impl Into<String>,
    ) -> Result<SlideshowData> {
        let payload = GenerateSlideshowPayload {
            images,
            title: title.into(),
            points: points.into(),
        };
        self.call_api(&Action::GenerateSlideshow(payload)).await
    }

    /// Five named colors for a theme.
    ///
    /// An answer without a `palette` array is a response-shape error.
    pub async fn generate_color_palette(&self, theme: &str) -> Result<Vec<Color>> {
        let prompt = format!(
            "Generate a color palette with 5 colors for the theme: {theme}. \
             Provide creative names for each color."
        );
        let result = self
            .generate_structured_text(prompt, color_palette_schema())
            .await?;

        match result.get("palette") {
            Some(palette @ Value::Array(_)) => serde_json::from_value(palette.clone())
                .map_err(|_| AtelierError::ResponseShapeError(INVALID_PALETTE.to_string())),
            _ => Err(AtelierError::ResponseShapeError(INVALID_PALETTE.to_string())),
        }
    }

    /// Transcribe speech and generate one image from the transcript.
    pub async fn design_from_voice(&self, recognizer: &dyn SpeechRecognizer) -> Result<VoiceDesign> {
        if !recognizer.is_supported() {
            return Err(AtelierError::Unsupported(
                "speech recognition is not supported on this platform".to_string(),
            ));
        }

        let transcript = recognizer.transcribe().await?;
        let transcript = transcript.trim().to_string();
        if transcript.is_empty() {
            return Err(AtelierError::InvalidInput(
                "no speech was recognized; please try again".to_string(),
            ));
        }

        let image = self
            .generate_image(transcript.as_str(), 1, crate::types::DEFAULT_ASPECT_RATIO)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                AtelierError::ResponseShapeError("The AI did not return an image.".to_string())
            })?;

        Ok(VoiceDesign { transcript, image })
    }
}
