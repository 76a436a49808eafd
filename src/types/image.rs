//! Transport-safe image payloads and data URLs

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::{AtelierError, Result};
use crate::utils::mime::guess_mime;

/// Base64 image bytes paired with their media type.
///
/// `data` is always the bare base64 payload, never a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableImage {
    pub data: String,
    pub mime_type: String,
}

impl SerializableImage {
    /// Pair an existing base64 payload with a media type.
    ///
    /// A `data:` prefix in `data` is stripped.
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        let data = data.into();
        let data = match data.split_once(";base64,") {
            Some((prefix, payload)) if prefix.starts_with("data:") => payload.to_string(),
            _ => data,
        };
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    /// Encode raw bytes.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            data: STANDARD.encode(bytes),
            mime_type: mime_type.into(),
        }
    }

    /// Parse a `data:<mime>;base64,<payload>` URL.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url.strip_prefix("data:").ok_or_else(|| {
            AtelierError::InvalidInput("data URL must start with `data:`".to_string())
        })?;
        let (mime_type, data) = rest.split_once(";base64,").ok_or_else(|| {
            AtelierError::InvalidInput("only base64 data URLs are supported".to_string())
        })?;
        Ok(Self {
            data: data.to_string(),
            mime_type: mime_type.to_string(),
        })
    }

    /// Read a file fully and encode it; the media type is detected from the
    /// file's magic bytes, then its extension.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AtelierError::IoError(format!("Failed to read {}: {e}", path.display()))
        })?;
        let mime_type = guess_mime(Some(&bytes), path.to_str());
        Ok(Self::from_bytes(&bytes, mime_type))
    }

    /// Decode the base64 payload back into bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| AtelierError::InvalidInput(format!("invalid base64 image data: {e}")))
    }

    /// Render as a data URL.
    pub fn to_data_url(&self) -> String {
        data_url(&self.mime_type, &self.data)
    }
}

/// Build a `data:<mime>;base64,<payload>` URL from a base64 payload.
pub fn data_url(mime_type: &str, base64_data: &str) -> String {
    format!("data:{mime_type};base64,{base64_data}")
}
