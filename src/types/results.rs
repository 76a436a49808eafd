//! Result shapes returned by the dispatcher

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw provider text returned when a JSON answer could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResponse {
    pub raw_response: String,
}

/// Result of `editImage`. `image` is a data URL using the provider-reported type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditedImage {
    pub text: Option<String>,
    pub image: String,
}

/// Parsed originality analysis with the generated look-alike images merged in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalityReport {
    #[serde(flatten)]
    pub analysis: Map<String, Value>,
    #[serde(default)]
    pub similar_images: Vec<String>,
}

/// Either a full originality report or the unparsed analysis text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OriginalityOutcome {
    Raw(RawResponse),
    Report(OriginalityReport),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandColors {
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub headline_font: String,
    pub body_font: String,
    pub reason: String,
}

/// Logo analysis as returned by the first brand-kit step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandAnalysis {
    pub colors: BrandColors,
    pub typography: Typography,
    pub style_keywords: Vec<String>,
}

/// Result of `generateBrandKit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitData {
    pub colors: BrandColors,
    pub typography: Typography,
    pub style_keywords: Vec<String>,
    pub mockups: Vec<String>,
}

impl KitData {
    pub fn from_analysis(analysis: BrandAnalysis, mockups: Vec<String>) -> Self {
        Self {
            colors: analysis.colors,
            typography: analysis.typography,
            style_keywords: analysis.style_keywords,
            mockups,
        }
    }
}

/// Result of `generateMoodBoard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodBoardData {
    pub images: Vec<String>,
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideType {
    Title,
    ImageLeft,
    ImageRight,
    FullImage,
    BulletPoints,
    End,
}

impl SlideType {
    pub const ALL: [SlideType; 6] = [
        SlideType::Title,
        SlideType::ImageLeft,
        SlideType::ImageRight,
        SlideType::FullImage,
        SlideType::BulletPoints,
        SlideType::End,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            SlideType::Title => "title",
            SlideType::ImageLeft => "image_left",
            SlideType::ImageRight => "image_right",
            SlideType::FullImage => "full_image",
            SlideType::BulletPoints => "bullet_points",
            SlideType::End => "end",
        }
    }
}

/// One slide. `image_index` refers to the request's image list and is not
/// range-checked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    #[serde(rename = "type")]
    pub slide_type: SlideType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<String>>,
}

/// Result of `generateSlideshow`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideshowData {
    pub slides: Vec<Slide>,
}

/// A named palette entry (client-side color palette tool).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub name: String,
    pub hex: String,
}

/// `data` of a successful dispatcher response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionOutput {
    Images(Vec<String>),
    Text(String),
    Json(Value),
    EditedImage(EditedImage),
    Originality(OriginalityOutcome),
    BrandKit(KitData),
    MoodBoard(MoodBoardData),
    Slideshow(SlideshowData),
}
