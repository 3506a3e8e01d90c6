//! Credential-cache routes — `/keyLogin` and the `/keyList` diagnostic.

use crate::{AppState, error::legacy_error};
use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyLoginRequest {
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct KeyListQuery {
    #[serde(default)]
    pub user: Option<String>,
}

/// Handles `POST /keyLogin` — warms the credential cache.
///
/// Idempotent: a key that is already cached is returned as-is, without
/// reconstructing the upstream handle.
pub async fn key_login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<KeyLoginRequest>,
) -> Response {
    if req.api_key.trim().is_empty() {
        return Json(json!({"error": "apiKey is null"})).into_response();
    }
    match state.keys.get_or_create(&req.api_key) {
        Ok(_) => Json(json!({"message": "success"})).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "key login failed");
            legacy_error(&e)
        }
    }
}

/// Handles `GET /keyList` — obfuscated listing of cached keys.
///
/// Gated behind a fixed query value; the masked output is diagnostic only,
/// not a secrecy mechanism.
pub async fn key_list(
    State(state): State<Arc<AppState>>,
    Query(q): Query<KeyListQuery>,
) -> Response {
    if q.user.as_deref() == Some("admin_ct") {
        Json(state.keys.known_keys()).into_response()
    } else {
        Json(json!({"error": "nothing"})).into_response()
    }
}
