//! Status-in-body response envelope used by the session/verify/config routes.
//!
//! The original wire contract reports failures inside an HTTP 200 body rather
//! than through status codes, so the envelope carries its own `status` field.

use serde::{Deserialize, Serialize};

/// Body-level status discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    Success,
    Fail,
    Unauthorized,
}

/// `{status, message, data}` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsePayload<T> {
    pub status: ResponseStatus,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ResponsePayload<T> {
    /// A `Success` payload carrying `data`.
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
            data: Some(data),
        }
    }

    /// A `Fail` payload with no data.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Fail,
            message: message.into(),
            data: None,
        }
    }

    /// An `Unauthorized` payload with no data.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Unauthorized,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_shape() {
        let p = ResponsePayload::success("", json!({"auth": true}));
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["status"], "Success");
        assert_eq!(v["message"], "");
        assert_eq!(v["data"]["auth"], true);
    }

    #[test]
    fn test_fail_has_null_data() {
        let p: ResponsePayload<()> = ResponsePayload::fail("Secret key is empty");
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["status"], "Fail");
        assert_eq!(v["message"], "Secret key is empty");
        assert!(v["data"].is_null());
    }

    #[test]
    fn test_unauthorized_shape() {
        let p: ResponsePayload<()> = ResponsePayload::unauthorized("No access rights");
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["status"], "Unauthorized");
    }
}
