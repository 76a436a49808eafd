//! Per-action request shaping and response reshaping
//!
//! Each function performs the provider call(s) for one action. Two-step
//! actions run their calls strictly in sequence; the second call is built from
//! the first call's result.

use serde_json::{Map, Value};

use super::parse::{ParseFailurePolicy, Parsed, parse_provider_json};
use super::prompts;
use crate::IMAGE_OUTPUT_MIME_TYPE;
use crate::error::{AtelierError, Result};
use crate::traits::{
    GeneratedImage, GenerativeProvider, ImageGenerationRequest, MultimodalRequest, ResponseFormat,
    ResponsePart,
};
use crate::types::{
    BrandAnalysis, EditedImage, GenerateBrandKitPayload, GenerateImagePayload,
    GenerateMoodBoardPayload, GenerateSlideshowPayload, GenerateStoryboardPayload,
    GenerateStructuredTextPayload, GenerateTextPayload, GenerateTextWithImagePayload, KitData,
    MoodBoardData, OriginalityOutcome, OriginalityReport, PromptWithImagePayload, RawResponse,
    SerializableImage, SlideshowData, data_url,
};

/// Generated images as `data:image/jpeg;base64,...` URLs.
fn to_data_urls(images: &[GeneratedImage]) -> Vec<String> {
    images
        .iter()
        .map(|img| data_url(IMAGE_OUTPUT_MIME_TYPE, &img.bytes_base64))
        .collect()
}

pub(crate) async fn generate_image(
    provider: &dyn GenerativeProvider,
    payload: GenerateImagePayload,
) -> Result<Vec<String>> {
    let request = ImageGenerationRequest::new(
        payload.prompt,
        payload.number_of_images,
        payload.aspect_ratio,
    );
    let images = provider.generate_images(request).await?;
    Ok(to_data_urls(&images))
}

pub(crate) async fn generate_storyboard(
    provider: &dyn GenerativeProvider,
    payload: GenerateStoryboardPayload,
) -> Result<Vec<String>> {
    let request = ImageGenerationRequest::new(
        prompts::storyboard_prompt(&payload.scene_description),
        prompts::STORYBOARD_PANELS,
        prompts::STORYBOARD_ASPECT_RATIO,
    );
    let images = provider.generate_images(request).await?;
    Ok(to_data_urls(&images))
}

pub(crate) async fn generate_structured_text(
    provider: &dyn GenerativeProvider,
    payload: GenerateStructuredTextPayload,
) -> Result<Value> {
    let text = provider
        .generate_structured(&payload.prompt, &payload.response_schema)
        .await?;
    parse_provider_json(&text, ParseFailurePolicy::Fail, "structured text")?
        .into_value("structured text")
}

pub(crate) async fn generate_text(
    provider: &dyn GenerativeProvider,
    payload: GenerateTextPayload,
) -> Result<String> {
    provider.generate_text(&payload.prompt).await
}

/// Plain text, or parsed JSON when `isJson` is set.
///
/// Unparseable JSON is returned as `{ "rawResponse": text }`.
pub(crate) async fn generate_text_with_image(
    provider: &dyn GenerativeProvider,
    payload: GenerateTextWithImagePayload,
) -> Result<Value> {
    let format = if payload.is_json {
        ResponseFormat::Json
    } else {
        ResponseFormat::Text
    };
    let request =
        MultimodalRequest::new(payload.prompt, payload.image).with_response_format(format);
    let text = provider.generate_multimodal(request).await?;

    if !payload.is_json {
        return Ok(Value::String(text));
    }
    match parse_provider_json::<Value>(&text, ParseFailurePolicy::FallbackRaw, "image answer")? {
        Parsed::Value(value) => Ok(value),
        Parsed::Raw(raw_response) => Ok(serde_json::to_value(RawResponse { raw_response })?),
    }
}

pub(crate) async fn edit_image(
    provider: &dyn GenerativeProvider,
    payload: PromptWithImagePayload,
) -> Result<EditedImage> {
    let parts = provider.edit_image(&payload.prompt, &payload.image).await?;

    let mut text = None;
    let mut image = None;
    for part in parts {
        match part {
            ResponsePart::Text(t) if !t.is_empty() => text = Some(t),
            ResponsePart::Text(_) => {}
            ResponsePart::InlineData { mime_type, data } => {
                image = Some(data_url(&mime_type, &data));
            }
        }
    }

    let image = image.ok_or_else(|| {
        AtelierError::ResponseShapeError("The AI did not return an edited image.".to_string())
    })?;
    Ok(EditedImage { text, image })
}

pub(crate) async fn analyze_originality(
    provider: &dyn GenerativeProvider,
    payload: PromptWithImagePayload,
) -> Result<OriginalityOutcome> {
    let request = MultimodalRequest::new(payload.prompt, payload.image)
        .with_response_format(ResponseFormat::Json);
    let text = provider.generate_multimodal(request).await?;

    let analysis = match parse_provider_json::<Map<String, Value>>(
        &text,
        ParseFailurePolicy::FallbackRaw,
        "originality analysis",
    )? {
        Parsed::Value(analysis) => analysis,
        Parsed::Raw(raw_response) => {
            return Ok(OriginalityOutcome::Raw(RawResponse { raw_response }));
        }
    };

    let similar: Vec<Value> = analysis
        .get("similarDesigns")
        .and_then(Value::as_array)
        .map(|designs| {
            designs
                .iter()
                .take(prompts::SIMILAR_DESIGN_LIMIT)
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    // One prompt from the first entry, one image per entry considered.
    let similar_images = match similar.first() {
        None => Vec::new(),
        Some(first) => {
            let request = ImageGenerationRequest::new(
                prompts::similar_design_prompt(first),
                similar.len() as u32,
                prompts::SIMILAR_DESIGN_ASPECT_RATIO,
            );
            to_data_urls(&provider.generate_images(request).await?)
        }
    };

    Ok(OriginalityOutcome::Report(OriginalityReport {
        analysis,
        similar_images,
    }))
}

pub(crate) async fn generate_brand_kit(
    provider: &dyn GenerativeProvider,
    payload: GenerateBrandKitPayload,
) -> Result<KitData> {
    let request = MultimodalRequest::new(prompts::BRAND_ANALYSIS_PROMPT, payload.image)
        .with_response_format(ResponseFormat::Schema(prompts::brand_analysis_schema()));
    let text = provider.generate_multimodal(request).await?;
    let analysis: BrandAnalysis =
        parse_provider_json(&text, ParseFailurePolicy::Fail, "logo analysis")?
            .into_value("logo analysis")?;

    let request = ImageGenerationRequest::new(
        prompts::brand_mockup_prompt(&analysis.style_keywords),
        prompts::MOCKUP_COUNT,
        prompts::MOCKUP_ASPECT_RATIO,
    );
    let mockups = to_data_urls(&provider.generate_images(request).await?);

    Ok(KitData::from_analysis(analysis, mockups))
}

pub(crate) async fn generate_mood_board(
    provider: &dyn GenerativeProvider,
    payload: GenerateMoodBoardPayload,
) -> Result<MoodBoardData> {
    let request = ImageGenerationRequest::new(
        prompts::mood_board_prompt(&payload.theme),
        prompts::MOOD_BOARD_IMAGES,
        prompts::MOOD_BOARD_ASPECT_RATIO,
    );
    let generated = provider.generate_images(request).await?;
    let first = generated.first().ok_or_else(|| {
        AtelierError::ResponseShapeError(
            "The AI did not return any images for the mood board.".to_string(),
        )
    })?;

    let reference = SerializableImage::new(first.bytes_base64.clone(), first.mime_type.clone());
    let request = MultimodalRequest::new(prompts::MOOD_BOARD_COLOR_PROMPT, reference)
        .with_response_format(ResponseFormat::Schema(prompts::mood_board_color_schema()));
    let text = provider.generate_multimodal(request).await?;

    let fallback: Vec<String> = prompts::FALLBACK_PALETTE
        .iter()
        .map(|c| c.to_string())
        .collect();
    let colors = parse_provider_json(
        &text,
        ParseFailurePolicy::Substitute(fallback),
        "mood board colors",
    )?
    .into_value("mood board colors")?;

    Ok(MoodBoardData {
        images: to_data_urls(&generated),
        colors,
    })
}

pub(crate) async fn generate_slideshow(
    provider: &dyn GenerativeProvider,
    payload: GenerateSlideshowPayload,
) -> Result<SlideshowData> {
    let prompt = prompts::slideshow_prompt(&payload.title, &payload.points, payload.images.len());
    let request = MultimodalRequest::with_images(prompt, payload.images)
        .with_response_format(ResponseFormat::Schema(prompts::slideshow_schema()));
    let text = provider.generate_multimodal(request).await?;
    parse_provider_json(&text, ParseFailurePolicy::Fail, "slideshow")?.into_value("slideshow")
}
