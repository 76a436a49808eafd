//! Dispatcher behavior per action, against a scripted provider.

mod support;

use std::sync::Arc;

use serde_json::{Value, json};

use atelier::dispatcher::Dispatcher;
use atelier::dispatcher::prompts::FALLBACK_PALETTE;
use atelier::error::AtelierError;
use atelier::traits::{ResponseFormat, ResponsePart};
use atelier::types::ActionOutput;
use support::{Call, MockProvider, sample_image};

fn dispatcher(provider: &Arc<MockProvider>) -> Dispatcher {
    Dispatcher::new(provider.clone())
}

async fn dispatch(provider: &Arc<MockProvider>, body: Value) -> Result<Value, AtelierError> {
    let output = dispatcher(provider)
        .dispatch_json(body.to_string().as_bytes())
        .await?;
    Ok(serde_json::to_value(output).unwrap())
}

fn image_json() -> Value {
    serde_json::to_value(sample_image()).unwrap()
}

#[tokio::test]
async fn generate_image_returns_jpeg_data_urls() {
    let provider = MockProvider::new();
    provider.push_images(&["AAAA"]);

    let data = dispatch(
        &provider,
        json!({"action": "generateImage", "payload": {"prompt": "cat", "numberOfImages": 1, "aspectRatio": "1:1"}}),
    )
    .await
    .unwrap();

    assert_eq!(data, json!(["data:image/jpeg;base64,AAAA"]));
    let requests = provider.image_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].prompt, "cat");
    assert_eq!(requests[0].count, 1);
    assert_eq!(requests[0].output_mime_type, "image/jpeg");
}

#[tokio::test]
async fn generate_image_defaults_invalid_options() {
    let provider = MockProvider::new();
    provider.push_images(&["AAAA", "BBBB"]);

    dispatch(
        &provider,
        json!({"action": "generateImage", "payload": {"prompt": "cat", "numberOfImages": "3", "aspectRatio": 5}}),
    )
    .await
    .unwrap();
    dispatch(
        &provider,
        json!({"action": "generateImage", "payload": {"prompt": "dog", "numberOfImages": -1}}),
    )
    .await
    .unwrap();

    let requests = provider.image_requests();
    assert_eq!(requests[0].count, 2);
    assert_eq!(requests[0].aspect_ratio, "1:1");
    assert_eq!(requests[1].count, 2);
}

#[tokio::test]
async fn unknown_action_is_rejected_without_provider_calls() {
    let provider = MockProvider::new();
    let err = dispatch(&provider, json!({"action": "deleteEverything", "payload": {}}))
        .await
        .unwrap_err();

    assert!(matches!(err, AtelierError::InvalidAction(_)));
    assert_eq!(err.status_code(), 400);
    assert_eq!(err.user_message(), "Invalid action");
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn mismatched_payload_is_a_bad_request_naming_the_action() {
    let provider = MockProvider::new();
    let err = dispatch(&provider, json!({"action": "generateText", "payload": {"text": "hi"}}))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert!(err.user_message().contains("generateText"));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let provider = MockProvider::new();
    let err = dispatcher(&provider)
        .dispatch_json(b"{\"payload\": {}}")
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn unconfigured_dispatcher_fails_before_any_call() {
    let err = Dispatcher::unconfigured()
        .dispatch_json(json!({"action": "generateText", "payload": {"prompt": "hi"}}).to_string().as_bytes())
        .await
        .unwrap_err();
    assert!(err.is_configuration_error());
    assert!(err.user_message().contains("API_KEY is not configured"));
}

#[tokio::test]
async fn storyboard_requests_four_widescreen_frames() {
    let provider = MockProvider::new();
    provider.push_images(&["A", "B", "C", "D"]);

    let data = dispatch(
        &provider,
        json!({"action": "generateStoryboard", "payload": {"sceneDescription": "a chase through a market"}}),
    )
    .await
    .unwrap();

    assert_eq!(data.as_array().map(Vec::len), Some(4));
    let request = &provider.image_requests()[0];
    assert_eq!(request.count, 4);
    assert_eq!(request.aspect_ratio, "16:9");
    assert!(request.prompt.contains("a chase through a market"));
}

#[tokio::test]
async fn structured_text_is_parsed() {
    let provider = MockProvider::new();
    provider.push_text(" {\"a\":1} ");

    let data = dispatch(
        &provider,
        json!({"action": "generateStructuredText", "payload": {"prompt": "p", "responseSchema": {"type": "object"}}}),
    )
    .await
    .unwrap();

    assert_eq!(data, json!({"a": 1}));
    assert!(matches!(provider.calls()[0], Call::Structured { .. }));
}

#[tokio::test]
async fn structured_text_forwards_the_caller_schema_unchanged() {
    let provider = MockProvider::new();
    provider.push_text("[\"a\",\"b\",\"c\",\"d\",\"e\"]").push_text("7");

    let list_schema = json!({"type": "ARRAY", "items": {"type": "STRING"}, "minItems": 5, "maxItems": 5});
    dispatch(
        &provider,
        json!({"action": "generateStructuredText", "payload": {"prompt": "five tags", "responseSchema": list_schema.clone()}}),
    )
    .await
    .unwrap();

    let union_schema = json!({"anyOf": [{"type": "STRING"}, {"type": "INTEGER"}]});
    let data = dispatch(
        &provider,
        json!({"action": "generateStructuredText", "payload": {"prompt": "a value", "responseSchema": union_schema.clone()}}),
    )
    .await
    .unwrap();
    assert_eq!(data, json!(7));

    let forwarded: Vec<Value> = provider
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Structured { schema, .. } => Some(serde_json::to_value(schema).unwrap()),
            _ => None,
        })
        .collect();
    assert_eq!(forwarded, vec![list_schema, union_schema]);
}

#[tokio::test]
async fn structured_text_that_is_not_json_fails() {
    let provider = MockProvider::new();
    provider.push_text("not json");

    let err = dispatch(
        &provider,
        json!({"action": "generateStructuredText", "payload": {"prompt": "p", "responseSchema": {"type": "OBJECT"}}}),
    )
    .await
    .unwrap_err();

    assert_eq!(err.status_code(), 500);
    assert!(matches!(err, AtelierError::ParseError { .. }));
}

#[tokio::test]
async fn generate_text_passes_through() {
    let provider = MockProvider::new();
    provider.push_text("hello there");

    let data = dispatch(&provider, json!({"action": "generateText", "payload": {"prompt": "hi"}}))
        .await
        .unwrap();
    assert_eq!(data, json!("hello there"));
    assert_eq!(provider.calls(), vec![Call::Text("hi".into())]);
}

#[tokio::test]
async fn text_with_image_sends_the_image_and_plain_mode() {
    let provider = MockProvider::new();
    provider.push_text("a small cat");

    let data = dispatch(
        &provider,
        json!({"action": "generateTextWithImage", "payload": {"prompt": "describe", "image": image_json()}}),
    )
    .await
    .unwrap();

    assert_eq!(data, json!("a small cat"));
    let request = &provider.multimodal_requests()[0];
    assert_eq!(request.images, vec![sample_image()]);
    assert_eq!(request.response_format, ResponseFormat::Text);
}

#[tokio::test]
async fn text_with_image_json_mode_falls_back_to_raw_response() {
    let provider = MockProvider::new();
    provider.push_text("{\"tags\": [\"cat\"]}").push_text("sorry, no json");

    let body = json!({"action": "generateTextWithImage", "payload": {"prompt": "tags", "image": image_json(), "isJson": true}});
    let parsed = dispatch(&provider, body.clone()).await.unwrap();
    let raw = dispatch(&provider, body).await.unwrap();

    assert_eq!(parsed, json!({"tags": ["cat"]}));
    assert_eq!(raw, json!({"rawResponse": "sorry, no json"}));
    assert_eq!(provider.multimodal_requests()[0].response_format, ResponseFormat::Json);
}

#[tokio::test]
async fn edit_image_keeps_last_text_and_image() {
    let provider = MockProvider::new();
    provider.push_edit_parts(vec![
        ResponsePart::Text("first".into()),
        ResponsePart::InlineData {
            mime_type: "image/png".into(),
            data: "OLD".into(),
        },
        ResponsePart::Text("done".into()),
        ResponsePart::InlineData {
            mime_type: "image/png".into(),
            data: "NEW".into(),
        },
    ]);

    let data = dispatch(
        &provider,
        json!({"action": "editImage", "payload": {"prompt": "make it blue", "image": image_json()}}),
    )
    .await
    .unwrap();

    assert_eq!(data, json!({"text": "done", "image": "data:image/png;base64,NEW"}));
}

#[tokio::test]
async fn text_with_image_treats_a_numeric_flag_as_json_mode() {
    let provider = MockProvider::new();
    provider.push_text("{\"tags\": [\"cat\"]}");

    let data = dispatch(
        &provider,
        json!({"action": "generateTextWithImage", "payload": {"prompt": "tags", "image": image_json(), "isJson": 1}}),
    )
    .await
    .unwrap();

    assert_eq!(data, json!({"tags": ["cat"]}));
    assert_eq!(provider.multimodal_requests()[0].response_format, ResponseFormat::Json);
}

#[tokio::test]
async fn edit_image_ignores_a_trailing_empty_text_part() {
    let provider = MockProvider::new();
    provider.push_edit_parts(vec![
        ResponsePart::Text("done".into()),
        ResponsePart::InlineData {
            mime_type: "image/png".into(),
            data: "NEW".into(),
        },
        ResponsePart::Text(String::new()),
    ]);

    let data = dispatch(
        &provider,
        json!({"action": "editImage", "payload": {"prompt": "make it blue", "image": image_json()}}),
    )
    .await
    .unwrap();

    assert_eq!(data, json!({"text": "done", "image": "data:image/png;base64,NEW"}));
}

#[tokio::test]
async fn edit_image_without_image_part_fails() {
    let provider = MockProvider::new();
    provider.push_edit_parts(vec![ResponsePart::Text("I cannot do that".into())]);

    let err = dispatch(
        &provider,
        json!({"action": "editImage", "payload": {"prompt": "x", "image": image_json()}}),
    )
    .await
    .unwrap_err();

    assert_eq!(err.status_code(), 500);
    assert_eq!(err.user_message(), "The AI did not return an edited image.");
}

#[tokio::test]
async fn originality_raw_fallback_skips_image_generation() {
    let provider = MockProvider::new();
    provider.push_text("this is not json");

    let data = dispatch(
        &provider,
        json!({"action": "analyzeOriginality", "payload": {"prompt": "check", "image": image_json()}}),
    )
    .await
    .unwrap();

    assert_eq!(data, json!({"rawResponse": "this is not json"}));
    assert!(provider.image_requests().is_empty());
}

#[tokio::test]
async fn originality_generates_images_from_the_first_similar_design() {
    let provider = MockProvider::new();
    provider.push_text(
        &json!({
            "originalityScore": 4,
            "summary": "derivative",
            "similarDesigns": [
                {"title": "Swoosh", "description": "a curved check mark"},
                {"title": "Arc", "description": "a semicircle"},
                {"title": "Wave", "description": "a sine wave"}
            ]
        })
        .to_string(),
    );
    provider.push_images(&["S1", "S2"]);

    let data = dispatch(
        &provider,
        json!({"action": "analyzeOriginality", "payload": {"prompt": "check", "image": image_json()}}),
    )
    .await
    .unwrap();

    assert_eq!(data["originalityScore"], json!(4));
    assert_eq!(
        data["similarImages"],
        json!(["data:image/jpeg;base64,S1", "data:image/jpeg;base64,S2"])
    );
    let requests = provider.image_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].count, 2);
    assert_eq!(requests[0].aspect_ratio, "1:1");
    assert!(requests[0].prompt.contains("Swoosh"));
    assert!(!requests[0].prompt.contains("Arc"));
}

#[tokio::test]
async fn originality_without_similar_designs_has_no_images() {
    let provider = MockProvider::new();
    provider.push_text("{\"originalityScore\": 10, \"similarDesigns\": []}");

    let data = dispatch(
        &provider,
        json!({"action": "analyzeOriginality", "payload": {"prompt": "check", "image": image_json()}}),
    )
    .await
    .unwrap();

    assert_eq!(data["similarImages"], json!([]));
    assert!(provider.image_requests().is_empty());
}

#[tokio::test]
async fn brand_kit_combines_analysis_and_mockups() {
    let provider = MockProvider::new();
    provider.push_text(
        &json!({
            "colors": {"primary": ["#112233"], "secondary": ["#445566"]},
            "typography": {"headlineFont": "Inter", "bodyFont": "Lora", "reason": "contrast"},
            "styleKeywords": ["minimal", "bold"]
        })
        .to_string(),
    );
    provider.push_images(&["M1", "M2"]);

    let data = dispatch(
        &provider,
        json!({"action": "generateBrandKit", "payload": {"image": image_json()}}),
    )
    .await
    .unwrap();

    assert_eq!(data["typography"]["headlineFont"], json!("Inter"));
    assert_eq!(data["mockups"].as_array().map(Vec::len), Some(2));

    let analysis_request = &provider.multimodal_requests()[0];
    assert!(matches!(analysis_request.response_format, ResponseFormat::Schema(_)));
    let mockup_request = &provider.image_requests()[0];
    assert_eq!(mockup_request.count, 2);
    assert_eq!(mockup_request.aspect_ratio, "4:3");
    assert!(mockup_request.prompt.contains("minimal, bold"));
}

#[tokio::test]
async fn brand_kit_parse_failure_carries_raw_details() {
    let provider = MockProvider::new();
    provider.push_text("{broken");

    let err = dispatch(
        &provider,
        json!({"action": "generateBrandKit", "payload": {"image": image_json()}}),
    )
    .await
    .unwrap_err();

    assert_eq!(err.status_code(), 500);
    assert_eq!(err.details(), Some(json!("{broken")));
    assert!(provider.image_requests().is_empty());
}

#[tokio::test]
async fn mood_board_stops_when_no_images_come_back() {
    let provider = MockProvider::new();
    provider.push_images(&[]);

    let err = dispatch(
        &provider,
        json!({"action": "generateMoodBoard", "payload": {"theme": "autumn"}}),
    )
    .await
    .unwrap_err();

    assert_eq!(err.status_code(), 500);
    assert!(provider.multimodal_requests().is_empty());
}

#[tokio::test]
async fn mood_board_falls_back_to_gray_palette() {
    let provider = MockProvider::new();
    provider.push_images(&["I1", "I2", "I3"]);
    provider.push_text("no colors here");

    let data = dispatch(
        &provider,
        json!({"action": "generateMoodBoard", "payload": {"theme": "autumn"}}),
    )
    .await
    .unwrap();

    assert_eq!(data["colors"], json!(FALLBACK_PALETTE));
    assert_eq!(data["images"].as_array().map(Vec::len), Some(3));

    let image_request = &provider.image_requests()[0];
    assert_eq!(image_request.count, 9);
    assert_eq!(image_request.aspect_ratio, "1:1");
    let color_request = &provider.multimodal_requests()[0];
    assert_eq!(color_request.images[0].data, "I1");
}

#[tokio::test]
async fn mood_board_uses_extracted_colors() {
    let provider = MockProvider::new();
    provider.push_images(&["I1"]);
    provider.push_text("[\"#AA0000\", \"#00BB00\"]");

    let data = dispatch(
        &provider,
        json!({"action": "generateMoodBoard", "payload": {"theme": "forest"}}),
    )
    .await
    .unwrap();

    assert_eq!(data["colors"], json!(["#AA0000", "#00BB00"]));
}

#[tokio::test]
async fn slideshow_sends_every_image_and_parses_slides() {
    let provider = MockProvider::new();
    provider.push_text(
        &json!({"slides": [
            {"type": "title", "title": "Launch"},
            {"type": "image_left", "image_index": 7, "text": "out of range is kept"},
            {"type": "end"}
        ]})
        .to_string(),
    );

    let data = dispatch(
        &provider,
        json!({"action": "generateSlideshow", "payload": {
            "images": [image_json(), image_json()],
            "title": "Launch",
            "points": "- speed\n- price"
        }}),
    )
    .await
    .unwrap();

    assert_eq!(data["slides"].as_array().map(Vec::len), Some(3));
    assert_eq!(data["slides"][1]["image_index"], json!(7));
    let request = &provider.multimodal_requests()[0];
    assert_eq!(request.images.len(), 2);
    assert!(request.prompt.contains("Launch"));
}

#[tokio::test]
async fn slideshow_parse_failure_is_an_error() {
    let provider = MockProvider::new();
    provider.push_text("slides: none");

    let err = dispatch(
        &provider,
        json!({"action": "generateSlideshow", "payload": {"images": [], "title": "t", "points": "p"}}),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn provider_errors_propagate_as_server_errors() {
    let provider = MockProvider::new();
    provider.push_text_error(AtelierError::ApiError {
        code: 429,
        message: "Gemini API error (RESOURCE_EXHAUSTED): quota".into(),
        details: None,
    });

    let err = dispatch(&provider, json!({"action": "generateText", "payload": {"prompt": "hi"}}))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 500);
    assert!(err.user_message().contains("quota"));
}

#[tokio::test]
async fn typed_dispatch_matches_json_dispatch() {
    let provider = MockProvider::new();
    provider.push_text("typed");

    let output = dispatcher(&provider)
        .dispatch(atelier::types::Action::GenerateText(
            atelier::types::GenerateTextPayload {
                prompt: "hi".into(),
            },
        ))
        .await
        .unwrap();
    assert_eq!(output, ActionOutput::Text("typed".into()));
}
