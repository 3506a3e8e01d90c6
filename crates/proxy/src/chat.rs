//! Chat handlers — legacy single-shot `/chat` and streaming `/chat-process`.

use crate::{AppState, error::legacy_error, stream};
use axum::{
    Json,
    body::Body,
    extract::State,
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use chatrelay_types::{ChatProcessRequest, RelayError};
use std::sync::Arc;

/// Handles `POST /chat` — the deprecated single-shot route.
///
/// Failures come back as an HTTP 200 `{error}` body, matching the wire
/// contract of the original service.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatProcessRequest>,
) -> Response {
    let key = match req.options.require_key() {
        Ok(k) => k.to_string(),
        Err(e) => return legacy_error(&e),
    };
    let handle = match state.keys.get_or_create(&key) {
        Ok(h) => h,
        Err(e) => return legacy_error(&e),
    };
    tracing::info!(model = handle.model_name(), "single-shot chat request");
    match handle.chat_once(&req.prompt, &req.options).await {
        Ok(msg) => Json(msg).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "single-shot chat failed");
            legacy_error(&e)
        }
    }
}

/// Handles `POST /chat-process` — the primary streaming route.
///
/// The response is a newline-framed sequence of JSON messages over
/// `application/octet-stream`. Failures before the first upstream message
/// produce a single-frame body; failures after that append one terminal
/// error frame (see [`stream::frame_messages`]). Either way the body is
/// finalized exactly once.
pub async fn chat_process(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatProcessRequest>,
) -> Response {
    let key = match req.options.require_key() {
        Ok(k) => k.to_string(),
        Err(e) => return single_frame(&e),
    };
    let handle = match state.keys.get_or_create(&key) {
        Ok(h) => h,
        Err(e) => return single_frame(&e),
    };
    tracing::info!(model = handle.model_name(), "streaming chat request");
    match handle.stream_chat(&req.prompt, &req.options).await {
        Ok(messages) => octet_response(Body::from_stream(stream::frame_messages(messages))),
        Err(e) => {
            tracing::warn!(error = %e, "streaming chat failed to start");
            single_frame(&e)
        }
    }
}

fn octet_response(body: Body) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/octet-stream")
        .body(body)
        .expect("valid response")
}

fn single_frame(e: &RelayError) -> Response {
    octet_response(Body::from(stream::error_frame(e)))
}
