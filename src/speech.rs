//! Speech-to-text capability used by the voice design flow
//!
//! Recognition happens outside this crate (typically in a browser). Callers
//! inject an implementation; [`UnsupportedSpeechRecognizer`] stands in where
//! none is available.

use async_trait::async_trait;

use crate::error::{AtelierError, Result};

#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Whether recognition can run on this target.
    fn is_supported(&self) -> bool;

    /// Listen once and return the final transcript.
    async fn transcribe(&self) -> Result<String>;
}

/// Recognizer for targets without speech support.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedSpeechRecognizer;

#[async_trait]
impl SpeechRecognizer for UnsupportedSpeechRecognizer {
    fn is_supported(&self) -> bool {
        false
    }

    async fn transcribe(&self) -> Result<String> {
        Err(AtelierError::Unsupported(
            "speech recognition is not available on this platform".to_string(),
        ))
    }
}
