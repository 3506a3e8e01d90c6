//! Unified error type for the chatrelay workspace.

use thiserror::Error;

/// Enumerates all error kinds that can occur across chatrelay crates.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The caller supplied no API key (or an empty one).
    #[error("key is null")]
    MissingCredential,

    /// The caller failed the shared-secret gate.
    #[error("No access rights")]
    AuthDenied,

    /// The upstream provider rejected the credential.
    #[error("upstream auth error: {0}")]
    UpstreamAuth(String),

    /// The upstream provider rate-limited the request.
    #[error("upstream rate limit: {0}")]
    UpstreamRateLimit(String),

    /// The upstream provider could not be reached or returned 5xx.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The upstream response did not match the expected shape.
    #[error("upstream protocol error: {0}")]
    UpstreamProtocol(String),

    /// HTTP transport error.
    #[error("http error: {0}")]
    Http(String),

    /// JSON serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration loading or validation error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl RelayError {
    /// Classifies a non-success upstream HTTP status into an error kind.
    #[must_use]
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::UpstreamAuth(body),
            429 => Self::UpstreamRateLimit(body),
            500..=599 => Self::UpstreamUnavailable(format!("status={status}, body={body}")),
            _ => Self::UpstreamProtocol(format!("status={status}, body={body}")),
        }
    }
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for RelayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() || e.is_connect() {
            Self::UpstreamUnavailable(e.to_string())
        } else {
            Self::Http(e.to_string())
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_missing_credential() {
        assert_eq!(RelayError::MissingCredential.to_string(), "key is null");
    }

    #[test]
    fn test_from_status_auth() {
        assert!(matches!(
            RelayError::from_status(401, "bad key".into()),
            RelayError::UpstreamAuth(_)
        ));
        assert!(matches!(
            RelayError::from_status(403, "forbidden".into()),
            RelayError::UpstreamAuth(_)
        ));
    }

    #[test]
    fn test_from_status_rate_limit() {
        assert!(matches!(
            RelayError::from_status(429, "slow down".into()),
            RelayError::UpstreamRateLimit(_)
        ));
    }

    #[test]
    fn test_from_status_unavailable() {
        let err = RelayError::from_status(503, "overloaded".into());
        assert!(matches!(err, RelayError::UpstreamUnavailable(_)));
        let s = err.to_string();
        assert!(s.contains("503"));
        assert!(s.contains("overloaded"));
    }

    #[test]
    fn test_from_status_other_is_protocol() {
        assert!(matches!(
            RelayError::from_status(418, "teapot".into()),
            RelayError::UpstreamProtocol(_)
        ));
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json {{{").unwrap_err();
        let err: RelayError = json_err.into();
        assert!(matches!(err, RelayError::Serialization(_)));
    }
}
