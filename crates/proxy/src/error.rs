//! Serialization of [`RelayError`] onto the legacy wire format.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use chatrelay_types::RelayError;
use serde_json::json;

/// Encodes an error as the original service did: HTTP 200 with an `{error}`
/// body (status-in-body pattern, kept for wire compatibility).
pub fn legacy_error(e: &RelayError) -> Response {
    Json(json!({"error": e.to_string()})).into_response()
}
