//! Wire-level chat data model shared between the proxy and client crates.
//!
//! Field names are camelCase on the wire for compatibility with the chat-web
//! frontend; the relay forwards `text`/`delta` without interpreting whether
//! the upstream sends cumulative or incremental content.

use crate::error::{RelayError, Result};
use futures_core::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// A pinned, sendable stream of partial chat messages.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<ChatMessage>> + Send>>;

/// One unit of output from the upstream provider.
///
/// For streaming calls, `text` carries the running concatenation and `delta`
/// the newest increment; each message supersedes the previous one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Upstream completion identifier, reusable as `parentMessageId` in a
    /// follow-up request.
    pub id: String,
    /// Message role (`"assistant"` for provider output).
    pub role: String,
    /// Message content so far.
    pub text: String,
    /// The increment carried by this chunk, if the call was streaming.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
    /// Identifier of the message this reply continues, echoed from the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<String>,
    /// Upstream finish reason, present on the final chunk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Per-request conversation parameters supplied by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatOptions {
    /// Opaque upstream credential selecting which cached handle to use.
    #[serde(default)]
    pub api_key: String,
    /// Prior message to continue from (forwarded opaquely; no history is kept).
    #[serde(default)]
    pub parent_message_id: Option<String>,
    /// Conversation identifier (forwarded opaquely).
    #[serde(default)]
    pub conversation_id: Option<String>,
    /// System prompt prepended to the upstream message list.
    #[serde(default)]
    pub system_message: Option<String>,
}

impl ChatOptions {
    /// Returns the API key if it is present and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::MissingCredential`] for an absent or empty key.
    pub fn require_key(&self) -> Result<&str> {
        if self.api_key.trim().is_empty() {
            Err(RelayError::MissingCredential)
        } else {
            Ok(&self.api_key)
        }
    }
}

/// Request body for `/chat` and `/chat-process`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatProcessRequest {
    pub prompt: String,
    #[serde(default)]
    pub options: ChatOptions,
}

/// Runtime configuration snapshot served by `/config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    pub api_model: String,
    pub reverse_proxy: Option<String>,
    pub timeout_ms: u64,
    pub socks_proxy: Option<String>,
    pub https_proxy: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_message_wire_shape() {
        let msg = ChatMessage {
            id: "chatcmpl-1".into(),
            role: "assistant".into(),
            text: "hello".into(),
            delta: Some("lo".into()),
            parent_message_id: Some("m0".into()),
            finish_reason: None,
        };
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["id"], "chatcmpl-1");
        assert_eq!(v["parentMessageId"], "m0");
        assert_eq!(v["delta"], "lo");
        // Optional fields that are unset stay off the wire.
        assert!(v.get("finishReason").is_none());
    }

    #[test]
    fn test_chat_message_json_never_contains_raw_newline() {
        let msg = ChatMessage {
            id: "chatcmpl-2".into(),
            role: "assistant".into(),
            text: "line one\nline two".into(),
            delta: None,
            parent_message_id: None,
            finish_reason: None,
        };
        let encoded = serde_json::to_string(&msg).unwrap();
        assert!(!encoded.contains('\n'));
        assert!(encoded.contains("\\n"));
    }

    #[test]
    fn test_request_with_defaulted_options() {
        let v = json!({"prompt": "hi"});
        let req: ChatProcessRequest = serde_json::from_value(v).unwrap();
        assert_eq!(req.prompt, "hi");
        assert!(req.options.api_key.is_empty());
        assert!(req.options.require_key().is_err());
    }

    #[test]
    fn test_require_key() {
        let v = json!({"prompt": "hi", "options": {"apiKey": "sk-test", "parentMessageId": "m1"}});
        let req: ChatProcessRequest = serde_json::from_value(v).unwrap();
        assert_eq!(req.options.require_key().unwrap(), "sk-test");
        assert_eq!(req.options.parent_message_id.as_deref(), Some("m1"));
    }

    #[test]
    fn test_require_key_rejects_whitespace() {
        let opts = ChatOptions {
            api_key: "   ".into(),
            ..ChatOptions::default()
        };
        assert!(matches!(
            opts.require_key(),
            Err(RelayError::MissingCredential)
        ));
    }
}
