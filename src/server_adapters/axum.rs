//! Axum router for the action endpoint
//!
//! One route accepts any method; non-POST requests are answered with 405
//! before the body is read.

use std::sync::Arc;

use axum::{Json, Router};
use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use http_body_util::LengthLimitError;

use super::{error_response, to_status_and_body};
use crate::dispatcher::Dispatcher;
use crate::error::AtelierError;

/// Largest request body accepted, in bytes. Image payloads are base64 encoded.
pub const DEFAULT_BODY_LIMIT: usize = 32 * 1024 * 1024;

impl IntoResponse for AtelierError {
    fn into_response(self) -> Response {
        json_response(error_response(&self))
    }
}

fn json_response((status, body): (u16, serde_json::Value)) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body)).into_response()
}

/// Build a router serving the dispatcher at `route`.
pub fn router(dispatcher: Arc<Dispatcher>, route: &str) -> Router {
    router_with_body_limit(dispatcher, route, DEFAULT_BODY_LIMIT)
}

pub fn router_with_body_limit(dispatcher: Arc<Dispatcher>, route: &str, limit: usize) -> Router {
    Router::new()
        .route(route, any(handle_action))
        .with_state(AppState { dispatcher, limit })
}

#[derive(Clone)]
struct AppState {
    dispatcher: Arc<Dispatcher>,
    limit: usize,
}

async fn handle_action(State(state): State<AppState>, request: Request) -> Response {
    if request.method() != Method::POST {
        return AtelierError::MethodNotAllowed.into_response();
    }

    let body = match to_bytes(request.into_body(), state.limit).await {
        Ok(body) => body,
        Err(e) if exceeds_limit(&e) => {
            return AtelierError::PayloadTooLarge(state.limit).into_response();
        }
        Err(e) => {
            return AtelierError::InvalidRequest(format!("Failed to read request body: {e}"))
                .into_response();
        }
    };

    json_response(to_status_and_body(state.dispatcher.dispatch_json(&body).await))
}

fn exceeds_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}
