//! Prompt templates and response schemas for the multi-step actions

use serde_json::Value;

use crate::types::StructuredSchema;

pub const STORYBOARD_PANELS: u32 = 4;
pub const STORYBOARD_ASPECT_RATIO: &str = "16:9";

pub const MOOD_BOARD_IMAGES: u32 = 9;
pub const MOOD_BOARD_ASPECT_RATIO: &str = "1:1";

pub const MOCKUP_COUNT: u32 = 2;
pub const MOCKUP_ASPECT_RATIO: &str = "4:3";

/// Maximum number of similar designs considered for image generation.
pub const SIMILAR_DESIGN_LIMIT: usize = 2;
pub const SIMILAR_DESIGN_ASPECT_RATIO: &str = "1:1";

/// Palette used when color extraction does not return parseable JSON.
pub const FALLBACK_PALETTE: [&str; 5] = ["#333333", "#666666", "#999999", "#CCCCCC", "#EEEEEE"];

pub fn storyboard_prompt(scene_description: &str) -> String {
    format!(
        "Create a cinematic storyboard of {STORYBOARD_PANELS} sequential frames for the following scene: \
         \"{scene_description}\". \
         Frame 1: a wide establishing shot that sets the location and mood. \
         Frame 2: a medium shot focused on the main action. \
         Frame 3: a close-up that captures emotion or a key detail. \
         Frame 4: a concluding shot that resolves the scene. \
         Keep characters, lighting and color grading consistent across frames, \
         in the style of professional film concept art."
    )
}

pub fn mood_board_prompt(theme: &str) -> String {
    format!(
        "A single evocative image for a design mood board with the theme \"{theme}\". \
         Focus on texture, color, lighting and atmosphere rather than text. \
         High quality, aesthetically pleasing, suitable for creative inspiration."
    )
}

pub const MOOD_BOARD_COLOR_PROMPT: &str = "Extract the 5 most representative colors of this image \
     as a palette for a mood board. Respond only with a JSON array of 5 hex color codes \
     (for example \"#A1B2C3\"), ordered from most to least dominant.";

pub fn mood_board_color_schema() -> StructuredSchema {
    StructuredSchema::array(
        StructuredSchema::string().with_description("A hex color code, e.g. #RRGGBB."),
    )
}

pub const BRAND_ANALYSIS_PROMPT: &str = "Act as a senior brand identity designer. Analyze this logo \
     and derive a brand identity kit from it. Provide primary and secondary color palettes as hex \
     codes, a typography pairing (a headline font and a body font, both available on Google Fonts) \
     with a short reason for the pairing, and 3 to 5 keywords that describe the visual style of \
     the brand.";

pub fn brand_analysis_schema() -> StructuredSchema {
    let hex_list = |description: &str| {
        StructuredSchema::array(StructuredSchema::string()).with_description(description)
    };
    StructuredSchema::object([
        (
            "colors",
            StructuredSchema::object([
                ("primary", hex_list("Primary brand colors as hex codes.")),
                ("secondary", hex_list("Secondary brand colors as hex codes.")),
            ])
            .with_required(["primary", "secondary"]),
        ),
        (
            "typography",
            StructuredSchema::object([
                (
                    "headlineFont",
                    StructuredSchema::string().with_description("Font for headlines."),
                ),
                (
                    "bodyFont",
                    StructuredSchema::string().with_description("Font for body text."),
                ),
                (
                    "reason",
                    StructuredSchema::string().with_description("Why the pairing fits the brand."),
                ),
            ])
            .with_required(["headlineFont", "bodyFont", "reason"]),
        ),
        (
            "styleKeywords",
            StructuredSchema::array(StructuredSchema::string())
                .with_description("Keywords describing the visual style."),
        ),
    ])
    .with_required(["colors", "typography", "styleKeywords"])
}

pub fn brand_mockup_prompt(style_keywords: &[String]) -> String {
    format!(
        "A professional product mockup showcasing a brand identity with a {} style. \
         Stationery, business cards and packaging arranged on a clean surface, \
         soft studio lighting, photorealistic.",
        style_keywords.join(", ")
    )
}

/// Prompt for an image inspired by one `similarDesigns` entry.
///
/// Entries are usually `{title, description}` objects but plain strings are accepted.
pub fn similar_design_prompt(entry: &Value) -> String {
    let subject = match entry {
        Value::String(s) => s.clone(),
        Value::Object(map) => {
            let field = |key: &str| map.get(key).and_then(Value::as_str).unwrap_or_default();
            match (field("title"), field("description")) {
                ("", "") => entry.to_string(),
                (title, "") => title.to_string(),
                ("", description) => description.to_string(),
                (title, description) => format!("{title}: {description}"),
            }
        }
        other => other.to_string(),
    };
    format!("A visual representation of the following existing design: {subject}")
}

pub fn slideshow_prompt(title: &str, points: &str, image_count: usize) -> String {
    format!(
        "You are a presentation designer. Using the {image_count} images provided \
         (referenced by zero-based index in the order given), design a slideshow titled \"{title}\". \
         Key points to cover:\n{points}\n\
         Start with a \"title\" slide and finish with an \"end\" slide. In between, use \
         \"image_left\", \"image_right\", \"full_image\" and \"bullet_points\" slides. \
         Image slides must set image_index; bullet slides must set points. \
         Keep the text short and presentation-ready."
    )
}

pub fn slideshow_schema() -> StructuredSchema {
    let slide = StructuredSchema::object([
        (
            "type",
            StructuredSchema::string_enum([
                "title",
                "image_left",
                "image_right",
                "full_image",
                "bullet_points",
                "end",
            ]),
        ),
        ("title", StructuredSchema::string()),
        ("subtitle", StructuredSchema::string()),
        ("text", StructuredSchema::string()),
        (
            "image_index",
            StructuredSchema::integer().with_description("Zero-based index of the image to show."),
        ),
        ("caption", StructuredSchema::string()),
        ("points", StructuredSchema::array(StructuredSchema::string())),
    ])
    .with_required(["type"]);

    StructuredSchema::object([("slides", StructuredSchema::array(slide))]).with_required(["slides"])
}
