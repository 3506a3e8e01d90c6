//! Shared-secret gate for privileged routes.

use crate::AppState;
use axum::{
    Json,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chatrelay_types::ResponsePayload;
use std::sync::Arc;

/// Plain equality check against the configured secret.
///
/// No secret configured means auth is disabled and every caller passes.
/// Otherwise the supplied token must be non-empty and exactly equal.
#[must_use]
pub fn authorize(secret: Option<&str>, supplied: &str) -> bool {
    match secret {
        None | Some("") => true,
        Some(s) => !supplied.is_empty() && supplied == s,
    }
}

/// Extracts the bearer token from an `Authorization` header value.
fn bearer_token(req: &Request) -> &str {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map_or("", str::trim)
}

/// Middleware guarding `/config`.
///
/// Denials are uniform: missing header, empty token, and mismatch all get the
/// same body, so callers cannot distinguish absence from mismatch.
pub async fn auth_gate(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    let secret = state.config.auth_secret_key.clone();
    if authorize(secret.as_deref(), bearer_token(&req)) {
        next.run(req).await
    } else {
        tracing::debug!("request denied by auth gate");
        let payload: ResponsePayload<()> = ResponsePayload::unauthorized("No access rights");
        Json(payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_secret_allows_everything() {
        assert!(authorize(None, ""));
        assert!(authorize(None, "anything"));
        assert!(authorize(Some(""), ""));
    }

    #[test]
    fn test_exact_match_required() {
        assert!(authorize(Some("s3cr3t"), "s3cr3t"));
        assert!(!authorize(Some("s3cr3t"), "S3CR3T"));
        assert!(!authorize(Some("s3cr3t"), "s3cr3t "));
        assert!(!authorize(Some("s3cr3t"), "wrong"));
    }

    #[test]
    fn test_empty_token_denied_when_secret_set() {
        assert!(!authorize(Some("s3cr3t"), ""));
    }
}
