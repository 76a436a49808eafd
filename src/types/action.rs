//! The closed set of dispatcher actions and their typed payloads
//!
//! On the wire a request is `{"action": "<name>", "payload": {...}}`. The
//! `Action` enum serializes to exactly that shape, so the client SDK and the
//! dispatcher share one definition.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::image::SerializableImage;
use super::schema::StructuredSchema;
use crate::error::{AtelierError, Result};

/// Image count used when `numberOfImages` is absent or not a positive number.
pub const DEFAULT_IMAGE_COUNT: u32 = 2;
/// Aspect ratio used when `aspectRatio` is absent or not a string.
pub const DEFAULT_ASPECT_RATIO: &str = "1:1";

/// Action names accepted by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    GenerateImage,
    GenerateStoryboard,
    GenerateStructuredText,
    GenerateText,
    GenerateTextWithImage,
    EditImage,
    AnalyzeOriginality,
    GenerateBrandKit,
    GenerateMoodBoard,
    GenerateSlideshow,
}

impl ActionKind {
    pub const ALL: [ActionKind; 10] = [
        ActionKind::GenerateImage,
        ActionKind::GenerateStoryboard,
        ActionKind::GenerateStructuredText,
        ActionKind::GenerateText,
        ActionKind::GenerateTextWithImage,
        ActionKind::EditImage,
        ActionKind::AnalyzeOriginality,
        ActionKind::GenerateBrandKit,
        ActionKind::GenerateMoodBoard,
        ActionKind::GenerateSlideshow,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ActionKind::GenerateImage => "generateImage",
            ActionKind::GenerateStoryboard => "generateStoryboard",
            ActionKind::GenerateStructuredText => "generateStructuredText",
            ActionKind::GenerateText => "generateText",
            ActionKind::GenerateTextWithImage => "generateTextWithImage",
            ActionKind::EditImage => "editImage",
            ActionKind::AnalyzeOriginality => "analyzeOriginality",
            ActionKind::GenerateBrandKit => "generateBrandKit",
            ActionKind::GenerateMoodBoard => "generateMoodBoard",
            ActionKind::GenerateSlideshow => "generateSlideshow",
        }
    }

    /// Look up an action by its wire name (exact, case-sensitive).
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImagePayload {
    pub prompt: String,
    #[serde(
        default = "default_image_count",
        deserialize_with = "lenient_image_count"
    )]
    pub number_of_images: u32,
    #[serde(
        default = "default_aspect_ratio",
        deserialize_with = "lenient_aspect_ratio"
    )]
    pub aspect_ratio: String,
}

impl GenerateImagePayload {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            number_of_images: DEFAULT_IMAGE_COUNT,
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateStoryboardPayload {
    pub scene_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateStructuredTextPayload {
    pub prompt: String,
    pub response_schema: StructuredSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateTextPayload {
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTextWithImagePayload {
    pub prompt: String,
    pub image: SerializableImage,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_json: bool,
}

/// Payload shared by actions that take a prompt plus one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptWithImagePayload {
    pub prompt: String,
    pub image: SerializableImage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateBrandKitPayload {
    pub image: SerializableImage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateMoodBoardPayload {
    pub theme: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateSlideshowPayload {
    pub images: Vec<SerializableImage>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub points: String,
}

/// A dispatcher request: one variant per action, each with its own payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "camelCase")]
pub enum Action {
    GenerateImage(GenerateImagePayload),
    GenerateStoryboard(GenerateStoryboardPayload),
    GenerateStructuredText(GenerateStructuredTextPayload),
    GenerateText(GenerateTextPayload),
    GenerateTextWithImage(GenerateTextWithImagePayload),
    EditImage(PromptWithImagePayload),
    AnalyzeOriginality(PromptWithImagePayload),
    GenerateBrandKit(GenerateBrandKitPayload),
    GenerateMoodBoard(GenerateMoodBoardPayload),
    GenerateSlideshow(GenerateSlideshowPayload),
}

/// Untyped request envelope, decoded before the action name is checked.
#[derive(Debug, Clone, Deserialize)]
struct ActionEnvelope {
    action: String,
    #[serde(default)]
    payload: Value,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::GenerateImage(_) => ActionKind::GenerateImage,
            Action::GenerateStoryboard(_) => ActionKind::GenerateStoryboard,
            Action::GenerateStructuredText(_) => ActionKind::GenerateStructuredText,
            Action::GenerateText(_) => ActionKind::GenerateText,
            Action::GenerateTextWithImage(_) => ActionKind::GenerateTextWithImage,
            Action::EditImage(_) => ActionKind::EditImage,
            Action::AnalyzeOriginality(_) => ActionKind::AnalyzeOriginality,
            Action::GenerateBrandKit(_) => ActionKind::GenerateBrandKit,
            Action::GenerateMoodBoard(_) => ActionKind::GenerateMoodBoard,
            Action::GenerateSlideshow(_) => ActionKind::GenerateSlideshow,
        }
    }

    /// Decode a typed action from its kind and raw payload.
    pub fn from_parts(kind: ActionKind, payload: Value) -> Result<Self> {
        fn typed<T: serde::de::DeserializeOwned>(kind: ActionKind, payload: Value) -> Result<T> {
            serde_json::from_value(payload).map_err(|e| {
                AtelierError::InvalidRequest(format!("Invalid payload for action `{kind}`: {e}"))
            })
        }

        Ok(match kind {
            ActionKind::GenerateImage => Action::GenerateImage(typed(kind, payload)?),
            ActionKind::GenerateStoryboard => Action::GenerateStoryboard(typed(kind, payload)?),
            ActionKind::GenerateStructuredText => {
                Action::GenerateStructuredText(typed(kind, payload)?)
            }
            ActionKind::GenerateText => Action::GenerateText(typed(kind, payload)?),
            ActionKind::GenerateTextWithImage => {
                Action::GenerateTextWithImage(typed(kind, payload)?)
            }
            ActionKind::EditImage => Action::EditImage(typed(kind, payload)?),
            ActionKind::AnalyzeOriginality => Action::AnalyzeOriginality(typed(kind, payload)?),
            ActionKind::GenerateBrandKit => Action::GenerateBrandKit(typed(kind, payload)?),
            ActionKind::GenerateMoodBoard => Action::GenerateMoodBoard(typed(kind, payload)?),
            ActionKind::GenerateSlideshow => Action::GenerateSlideshow(typed(kind, payload)?),
        })
    }

    /// Decode a request body.
    ///
    /// The action name is checked before the payload so that unknown actions
    /// are reported as such regardless of what the payload contains.
    pub fn from_json_slice(body: &[u8]) -> Result<Self> {
        let envelope: ActionEnvelope = serde_json::from_slice(body)
            .map_err(|e| AtelierError::InvalidRequest(format!("Invalid request body: {e}")))?;
        let kind = ActionKind::parse(&envelope.action)
            .ok_or(AtelierError::InvalidAction(envelope.action))?;
        Self::from_parts(kind, envelope.payload)
    }
}

fn default_image_count() -> u32 {
    DEFAULT_IMAGE_COUNT
}

fn default_aspect_ratio() -> String {
    DEFAULT_ASPECT_RATIO.to_string()
}

fn lenient_image_count<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value.as_f64() {
        Some(n) if n.is_finite() && n > 0.0 => (n as u32).max(1),
        _ => DEFAULT_IMAGE_COUNT,
    })
}

fn lenient_aspect_ratio<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        _ => DEFAULT_ASPECT_RATIO.to_string(),
    })
}

/// Truthiness as loosely typed callers expect it: `false`, `null`, `0` and
/// `""` are false, everything else is true.
fn lenient_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}
