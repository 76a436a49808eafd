//! Error types for atelier
//!
//! A single error enum is shared by the dispatcher, the provider layer and the
//! client SDK. Each variant knows the HTTP status it maps to when it crosses the
//! server boundary, and the message that is shown to callers.

use serde_json::Value;
use thiserror::Error;

/// Message fragment the server uses when the provider credential is missing.
///
/// The client layer matches on this fragment to produce a friendlier message.
pub const MISSING_API_KEY_MESSAGE: &str =
    "API_KEY is not configured in the server environment variables.";

/// Fallback message used when an error carries no text of its own.
pub const UNKNOWN_SERVER_ERROR: &str = "An unknown server error occurred.";

/// Errors produced anywhere in the request/response mediation path.
#[derive(Error, Debug, Clone)]
pub enum AtelierError {
    /// The provider credential is not configured on the server.
    #[error("{0}")]
    MissingApiKey(String),

    /// Any other configuration problem (HTTP client construction, bad env values).
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The endpoint was called with a method other than POST.
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// The `action` tag is not one of the supported actions.
    #[error("Invalid action")]
    InvalidAction(String),

    /// The request body or an action payload could not be decoded.
    #[error("{0}")]
    InvalidRequest(String),

    /// The request body exceeds the configured size limit.
    #[error("Request body exceeds the {0} byte limit")]
    PayloadTooLarge(usize),

    /// Caller-side input that cannot be sent (e.g. an empty transcript).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The provider answered with a non-success status or an unusable envelope.
    #[error("{message}")]
    ApiError {
        code: u16,
        message: String,
        details: Option<Value>,
    },

    /// Transport-level failure talking to the provider or the dispatcher.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Provider text that was expected to be JSON could not be parsed.
    #[error("{message}")]
    ParseError {
        message: String,
        /// Raw provider text, echoed back as `details` in error responses.
        raw: Option<String>,
    },

    /// The provider response parsed but lacks a required part or field.
    #[error("{0}")]
    ResponseShapeError(String),

    /// Serialization of an outgoing body failed.
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Local I/O failure (reading an image file).
    #[error("IO error: {0}")]
    IoError(String),

    /// An optional capability is not available on this target.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// The dispatcher answered with an error envelope (client side).
    #[error("{message}")]
    RemoteError {
        status: u16,
        message: String,
        details: Option<Value>,
    },
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, AtelierError>;

impl AtelierError {
    /// Build a configuration error for a missing provider credential.
    pub fn missing_api_key() -> Self {
        Self::MissingApiKey(MISSING_API_KEY_MESSAGE.to_string())
    }

    /// Build a parse error that keeps the raw provider text.
    pub fn parse_with_raw(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            raw: Some(raw.into()),
        }
    }

    /// HTTP status this error maps to at the dispatcher boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MethodNotAllowed => 405,
            Self::InvalidAction(_) | Self::InvalidRequest(_) => 400,
            Self::PayloadTooLarge(_) => 413,
            Self::RemoteError { status, .. } => *status,
            _ => 500,
        }
    }

    /// Whether this error stems from a missing or broken configuration.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::MissingApiKey(_) | Self::ConfigurationError(_))
    }

    /// Message exposed to callers in the `error` field.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            UNKNOWN_SERVER_ERROR.to_string()
        } else {
            message
        }
    }

    /// Extra structured context exposed as `details`, when present.
    pub fn details(&self) -> Option<Value> {
        match self {
            Self::ParseError { raw: Some(raw), .. } => Some(Value::String(raw.clone())),
            Self::ApiError { details, .. } | Self::RemoteError { details, .. } => details.clone(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AtelierError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<reqwest::Error> for AtelierError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

impl From<std::io::Error> for AtelierError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}
