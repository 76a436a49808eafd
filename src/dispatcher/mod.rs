//! Action dispatcher
//!
//! Validates an `{action, payload}` request, runs the provider call(s) for the
//! action and reshapes the answer into the `data` of a successful response.
//! The dispatcher holds no mutable state and is shared behind an `Arc`.
//!
//! Checks run in a fixed order: credential, body, action name, payload. The
//! HTTP method is checked earlier by the server adapter.

mod actions;
pub mod parse;
pub mod prompts;

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use crate::error::{AtelierError, Result};
use crate::traits::GenerativeProvider;
use crate::types::{Action, ActionOutput};

pub use parse::{ParseFailurePolicy, Parsed, parse_provider_json};

/// Routes actions to a [`GenerativeProvider`].
///
/// A dispatcher without a provider is valid: every request then fails with the
/// missing-credential configuration error before anything else is inspected.
#[derive(Clone, Default)]
pub struct Dispatcher {
    provider: Option<Arc<dyn GenerativeProvider>>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("provider", &self.provider.as_ref().map(|p| p.provider_id()))
            .finish()
    }
}

impl Dispatcher {
    pub fn new(provider: Arc<dyn GenerativeProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// A dispatcher with no provider credential.
    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// Build a Gemini-backed dispatcher.
    ///
    /// A missing API key yields an unconfigured dispatcher rather than an
    /// error, so the server can start and report the problem per request.
    #[cfg(feature = "gemini")]
    pub fn from_gemini(builder: crate::providers::gemini::GeminiBuilder) -> Result<Self> {
        match builder.build() {
            Ok(client) => Ok(Self::new(Arc::new(client))),
            Err(AtelierError::MissingApiKey(_)) => {
                tracing::warn!("no provider API key configured; every request will fail");
                Ok(Self::unconfigured())
            }
            Err(e) => Err(e),
        }
    }

    /// Gemini-backed dispatcher configured from the environment.
    #[cfg(feature = "gemini")]
    pub fn from_env() -> Result<Self> {
        Self::from_gemini(crate::providers::gemini::GeminiBuilder::new())
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    fn provider(&self) -> Result<&dyn GenerativeProvider> {
        self.provider
            .as_deref()
            .ok_or_else(AtelierError::missing_api_key)
    }

    /// Run an already decoded action.
    pub async fn dispatch(&self, action: Action) -> Result<ActionOutput> {
        let provider = self.provider()?;
        Self::execute(provider, action).await
    }

    /// Decode a raw request body and run it.
    ///
    /// The credential is checked before the body is looked at.
    pub async fn dispatch_json(&self, body: &[u8]) -> Result<ActionOutput> {
        let provider = self.provider()?;
        let action = Action::from_json_slice(body)?;
        Self::execute(provider, action).await
    }

    async fn execute(provider: &dyn GenerativeProvider, action: Action) -> Result<ActionOutput> {
        let kind = action.kind();
        let span = tracing::info_span!(
            "dispatch",
            request_id = %Uuid::new_v4(),
            action = %kind,
            provider = provider.provider_id(),
        );

        async move {
            tracing::debug!("dispatching action");
            let output = match action {
                Action::GenerateImage(p) => {
                    ActionOutput::Images(actions::generate_image(provider, p).await?)
                }
                Action::GenerateStoryboard(p) => {
                    ActionOutput::Images(actions::generate_storyboard(provider, p).await?)
                }
                Action::GenerateStructuredText(p) => {
                    ActionOutput::Json(actions::generate_structured_text(provider, p).await?)
                }
                Action::GenerateText(p) => {
                    ActionOutput::Text(actions::generate_text(provider, p).await?)
                }
                Action::GenerateTextWithImage(p) => {
                    match actions::generate_text_with_image(provider, p).await? {
                        serde_json::Value::String(text) => ActionOutput::Text(text),
                        value => ActionOutput::Json(value),
                    }
                }
                Action::EditImage(p) => {
                    ActionOutput::EditedImage(actions::edit_image(provider, p).await?)
                }
                Action::AnalyzeOriginality(p) => {
                    ActionOutput::Originality(actions::analyze_originality(provider, p).await?)
                }
                Action::GenerateBrandKit(p) => {
                    ActionOutput::BrandKit(actions::generate_brand_kit(provider, p).await?)
                }
                Action::GenerateMoodBoard(p) => {
                    ActionOutput::MoodBoard(actions::generate_mood_board(provider, p).await?)
                }
                Action::GenerateSlideshow(p) => {
                    ActionOutput::Slideshow(actions::generate_slideshow(provider, p).await?)
                }
            };
            tracing::debug!("action completed");
            Ok(output)
        }
        .instrument(span)
        .await
    }
}
