//! Server adapters: expose the [`Dispatcher`](crate::dispatcher::Dispatcher) over HTTP
//!
//! The framework-agnostic part turns a dispatch result into a status code and
//! a JSON envelope. The axum router lives behind the `server` feature.
//!
//! ## Example (Axum)
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "server", feature = "gemini"))]
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use atelier::dispatcher::Dispatcher;
//! use atelier::server_adapters::axum::router;
//!
//! let dispatcher = Arc::new(Dispatcher::from_env()?);
//! let app = router(dispatcher, "/api/gemini");
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

use serde_json::Value;

use crate::error::{AtelierError, Result};
use crate::types::{ActionOutput, DataEnvelope, ErrorEnvelope};

#[cfg(feature = "server")]
pub mod axum;

/// Convert a dispatch result into `(status, body)`.
///
/// This is the single place where errors are logged before they leave the
/// process.
pub fn to_status_and_body(result: Result<ActionOutput>) -> (u16, Value) {
    match result {
        Ok(data) => match serde_json::to_value(DataEnvelope { data }) {
            Ok(body) => (200, body),
            Err(e) => error_response(&AtelierError::from(e)),
        },
        Err(err) => error_response(&err),
    }
}

/// Log an error and render its `{ error, details? }` envelope.
pub fn error_response(err: &AtelierError) -> (u16, Value) {
    let status = err.status_code();
    if status >= 500 {
        tracing::error!(status, error = %err, "error in API handler");
    } else {
        tracing::warn!(status, error = %err, "request rejected");
    }
    let body = serde_json::to_value(ErrorEnvelope::from(err))
        .unwrap_or_else(|_| serde_json::json!({ "error": crate::error::UNKNOWN_SERVER_ERROR }));
    (status, body)
}
