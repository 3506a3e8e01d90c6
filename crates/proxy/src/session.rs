//! Session, verify, and runtime-config routes.

use crate::AppState;
use axum::{Json, extract::State};
use chatrelay_types::{ResponsePayload, RuntimeConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct SessionData {
    pub auth: bool,
    pub model: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub token: String,
}

/// Handles `POST /session` — reports whether auth is required and which model
/// is active. Never fails at the HTTP layer.
pub async fn session(State(state): State<Arc<AppState>>) -> Json<ResponsePayload<SessionData>> {
    Json(ResponsePayload::success(
        "",
        SessionData {
            auth: state.config.auth_enabled(),
            model: state.config.openai_api_model.clone(),
        },
    ))
}

/// Handles `POST /verify` — checks a token against the configured secret.
///
/// Unlike the uniform auth gate, this route distinguishes an empty token from
/// a mismatched one; the asymmetry is kept for wire compatibility with the
/// existing frontend. With no secret configured, every token is invalid here.
pub async fn verify(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyRequest>,
) -> Json<ResponsePayload<()>> {
    if req.token.is_empty() {
        return Json(ResponsePayload::fail("Secret key is empty"));
    }
    if state.config.auth_secret_key.as_deref() == Some(req.token.as_str()) {
        Json(ResponsePayload::success("Verify successfully", ()))
    } else {
        Json(ResponsePayload::fail("Secret key is invalid"))
    }
}

/// Handles `POST /config` (behind the auth gate) — runtime settings snapshot.
pub async fn runtime_config(State(state): State<Arc<AppState>>) -> Json<RuntimeConfig> {
    Json(state.config.runtime_config())
}
