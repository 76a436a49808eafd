//! Client SDK against a mock dispatcher endpoint.

use async_trait::async_trait;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use atelier::client::{StudioClient, UNKNOWN_API_ERROR, file_to_serializable};
use atelier::error::{AtelierError, MISSING_API_KEY_MESSAGE, Result};
use atelier::speech::{SpeechRecognizer, UnsupportedSpeechRecognizer};
use atelier::types::{OriginalityOutcome, SerializableImage};

const ROUTE: &str = "/api/gemini";

fn client(server: &MockServer) -> StudioClient {
    StudioClient::new(format!("{}{ROUTE}", server.uri())).expect("client")
}

fn action_is(name: &'static str) -> impl Fn(&Request) -> bool {
    move |req: &Request| {
        serde_json::from_slice::<Value>(&req.body)
            .map(|v| v["action"] == json!(name))
            .unwrap_or(false)
    }
}

#[tokio::test]
async fn generate_image_posts_the_action_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE))
        .and(body_json(json!({
            "action": "generateImage",
            "payload": {"prompt": "cat", "numberOfImages": 1, "aspectRatio": "1:1"}
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": ["data:image/jpeg;base64,AAAA"]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let urls = client(&server).generate_image("cat", 1, "1:1").await.unwrap();
    assert_eq!(urls, vec!["data:image/jpeg;base64,AAAA".to_string()]);
}

#[tokio::test]
async fn missing_server_key_becomes_a_configuration_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": MISSING_API_KEY_MESSAGE})),
        )
        .mount(&server)
        .await;

    let err = client(&server).generate_text("hi").await.unwrap_err();
    assert!(matches!(err, AtelierError::ConfigurationError(_)));
    assert!(err.to_string().contains("site administrator must add it"));
}

#[tokio::test]
async fn server_errors_keep_status_message_and_details() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "Failed to parse logo analysis returned by the AI",
            "details": "{broken"
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .generate_brand_kit(SerializableImage::new("AAAA", "image/png"))
        .await
        .unwrap_err();
    match err {
        AtelierError::RemoteError {
            status,
            message,
            details,
        } => {
            assert_eq!(status, 500);
            assert!(message.contains("logo analysis"));
            assert_eq!(details, Some(json!("{broken")));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn error_without_message_uses_the_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let err = client(&server).generate_text("hi").await.unwrap_err();
    assert_eq!(err.to_string(), UNKNOWN_API_ERROR);
    assert_eq!(err.status_code(), 502);
}

#[tokio::test]
async fn color_palette_unwraps_the_palette_array() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE))
        .and(action_is("generateStructuredText"))
        .and(|req: &Request| {
            let body: Value = serde_json::from_slice(&req.body).unwrap_or(Value::Null);
            body["payload"]["responseSchema"]["required"] == json!(["palette"])
                && body["payload"]["prompt"]
                    .as_str()
                    .is_some_and(|p| p.contains("ocean"))
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"palette": [
            {"name": "Deep Sea", "hex": "#003366"},
            {"name": "Foam", "hex": "#E0F7FA"}
        ]}})))
        .expect(1)
        .mount(&server)
        .await;

    let palette = client(&server).generate_color_palette("ocean").await.unwrap();
    assert_eq!(palette.len(), 2);
    assert_eq!(palette[0].name, "Deep Sea");
    assert_eq!(palette[1].hex, "#E0F7FA");
}

#[tokio::test]
async fn color_palette_without_palette_is_a_shape_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"colors": []}})))
        .mount(&server)
        .await;

    let err = client(&server).generate_color_palette("ocean").await.unwrap_err();
    assert!(matches!(err, AtelierError::ResponseShapeError(_)));
    assert_eq!(err.to_string(), "Invalid response format from API for color palette.");
}

#[tokio::test]
async fn detailed_brief_wraps_the_idea_in_the_template() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE))
        .and(action_is("generateText"))
        .and(|req: &Request| {
            let body: Value = serde_json::from_slice(&req.body).unwrap_or(Value::Null);
            body["payload"]["prompt"]
                .as_str()
                .is_some_and(|p| p.starts_with("Act as a creative director") && p.contains("\"a fox logo\""))
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "A fox logo, rendered..."})))
        .expect(1)
        .mount(&server)
        .await;

    let brief = client(&server).generate_detailed_brief("a fox logo").await.unwrap();
    assert!(brief.starts_with("A fox logo"));
}

#[tokio::test]
async fn originality_results_deserialize_both_shapes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"rawResponse": "plain"}})),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ROUTE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {
            "originalityScore": 8,
            "similarDesigns": [],
            "similarImages": []
        }})))
        .mount(&server)
        .await;

    let image = SerializableImage::new("AAAA", "image/png");
    let first = client(&server)
        .analyze_originality("check", image.clone())
        .await
        .unwrap();
    let second = client(&server)
        .analyze_originality("check", image)
        .await
        .unwrap();

    assert!(matches!(first, OriginalityOutcome::Raw(ref r) if r.raw_response == "plain"));
    match second {
        OriginalityOutcome::Report(report) => {
            assert_eq!(report.analysis["originalityScore"], json!(8));
            assert!(report.similar_images.is_empty());
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn file_round_trip_preserves_bytes_and_detects_type() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("logo.bin");
    let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13, b'I', b'H', b'D', b'R'];
    std::fs::write(&file, png).unwrap();

    let image = file_to_serializable(&file).await.unwrap();
    assert_eq!(image.mime_type, "image/png");
    assert!(!image.data.starts_with("data:"));
    assert_eq!(image.decode().unwrap(), png.to_vec());
}

#[tokio::test]
async fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = file_to_serializable(dir.path().join("nope.png"))
        .await
        .unwrap_err();
    assert!(matches!(err, AtelierError::IoError(_)));
}

struct FixedRecognizer(&'static str);

#[async_trait]
impl SpeechRecognizer for FixedRecognizer {
    fn is_supported(&self) -> bool {
        true
    }

    async fn transcribe(&self) -> Result<String> {
        Ok(self.0.to_string())
    }
}

#[tokio::test]
async fn voice_design_generates_one_image_from_the_transcript() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE))
        .and(body_json(json!({
            "action": "generateImage",
            "payload": {"prompt": "a red balloon", "numberOfImages": 1, "aspectRatio": "1:1"}
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": ["data:image/jpeg;base64,RB"]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let design = client(&server)
        .design_from_voice(&FixedRecognizer("  a red balloon "))
        .await
        .unwrap();
    assert_eq!(design.transcript, "a red balloon");
    assert_eq!(design.image, "data:image/jpeg;base64,RB");
}

#[tokio::test]
async fn voice_design_rejects_unsupported_and_empty_input() {
    let server = MockServer::start().await;
    let client = client(&server);

    let err = client
        .design_from_voice(&UnsupportedSpeechRecognizer)
        .await
        .unwrap_err();
    assert!(matches!(err, AtelierError::Unsupported(_)));

    let err = client
        .design_from_voice(&FixedRecognizer("   "))
        .await
        .unwrap_err();
    assert!(matches!(err, AtelierError::InvalidInput(_)));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
