//! JSON parsing of provider text with an explicit failure policy
//!
//! Several actions ask the provider for JSON and parse the answer. What happens
//! when the text is not valid JSON differs per call site, so the choice is made
//! explicit here instead of being repeated ad hoc.

use serde::de::DeserializeOwned;

use crate::error::{AtelierError, Result};

/// What to do when provider text does not parse into the expected type.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseFailurePolicy<T> {
    /// Propagate a parse error carrying the raw text.
    Fail,
    /// Hand back the raw text instead of a value.
    FallbackRaw,
    /// Use a fixed value instead.
    Substitute(T),
}

/// Outcome of a policy-governed parse.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<T> {
    Value(T),
    Raw(String),
}

impl<T> Parsed<T> {
    /// The parsed value, or a parse error for raw text.
    pub fn into_value(self, what: &str) -> Result<T> {
        match self {
            Parsed::Value(v) => Ok(v),
            Parsed::Raw(raw) => Err(AtelierError::parse_with_raw(
                format!("Failed to parse {what} returned by the AI"),
                raw,
            )),
        }
    }
}

/// Parse `text` as JSON into `T`, applying `policy` on failure.
///
/// `what` names the value in logs and error messages.
pub fn parse_provider_json<T>(
    text: &str,
    policy: ParseFailurePolicy<T>,
    what: &str,
) -> Result<Parsed<T>>
where
    T: DeserializeOwned,
{
    match serde_json::from_str::<T>(text.trim()) {
        Ok(value) => Ok(Parsed::Value(value)),
        Err(e) => match policy {
            ParseFailurePolicy::Fail => Err(AtelierError::parse_with_raw(
                format!("Failed to parse {what} returned by the AI: {e}"),
                text,
            )),
            ParseFailurePolicy::FallbackRaw => {
                tracing::warn!(what, error = %e, "provider JSON unparseable, returning raw text");
                Ok(Parsed::Raw(text.to_string()))
            }
            ParseFailurePolicy::Substitute(fallback) => {
                tracing::warn!(what, error = %e, "provider JSON unparseable, using fallback");
                Ok(Parsed::Value(fallback))
            }
        },
    }
}
