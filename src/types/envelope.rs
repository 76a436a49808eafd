//! Response envelopes shared by the server adapter and the client SDK

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AtelierError;

/// Successful response: `{ "data": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Failed response: `{ "error": "...", "details": ... }`.
///
/// `error` is optional on the way in because a misbehaving server may omit it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl From<&AtelierError> for ErrorEnvelope {
    fn from(err: &AtelierError) -> Self {
        Self {
            error: Some(err.user_message()),
            details: err.details(),
        }
    }
}
