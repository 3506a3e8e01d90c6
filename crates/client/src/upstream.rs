//! Per-credential handle for the upstream chat-completions API.

use crate::sse;
use chatrelay_config::Config;
use chatrelay_types::{ChatMessage, ChatOptions, ChatStream, RelayError, Result};
use serde_json::{Value, json};
use std::time::Duration;

/// Default upstream chat-completions endpoint.
const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// How long to wait for the upstream TCP/TLS handshake.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A constructed, reusable client for one upstream credential.
///
/// Holds its own `reqwest::Client` so proxy settings are baked in at
/// construction time; the [`KeyCache`](crate::KeyCache) keeps at most one
/// instance per credential for the process lifetime.
pub struct UpstreamClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
    timeout: Duration,
}

impl UpstreamClient {
    /// Constructs a handle for `api_key` using the proxy/model settings in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::UpstreamAuth`] for a blank or non-printable key,
    /// and [`RelayError::Config`] for an invalid proxy URL.
    pub fn new(api_key: &str, config: &Config) -> Result<Self> {
        if api_key.trim().is_empty() || !api_key.chars().all(|c| c.is_ascii_graphic()) {
            return Err(RelayError::UpstreamAuth("malformed api key".into()));
        }

        let mut builder = reqwest::Client::builder().connect_timeout(CONNECT_TIMEOUT);
        for url in [config.socks_proxy.as_deref(), config.https_proxy.as_deref()]
            .into_iter()
            .flatten()
        {
            let proxy = reqwest::Proxy::all(url)
                .map_err(|e| RelayError::Config(format!("invalid proxy url {url}: {e}")))?;
            builder = builder.proxy(proxy);
        }
        let http = builder
            .build()
            .map_err(|e| RelayError::Config(e.to_string()))?;

        Ok(Self {
            http,
            api_key: api_key.to_string(),
            endpoint: config
                .api_reverse_proxy
                .clone()
                .unwrap_or_else(|| API_URL.to_string()),
            model: config.openai_api_model.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
        })
    }

    /// The model this handle sends completions to.
    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model
    }

    fn request_body(&self, prompt: &str, options: &ChatOptions, stream: bool) -> Value {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &options.system_message {
            messages.push(json!({"role": "system", "content": system}));
        }
        messages.push(json!({"role": "user", "content": prompt}));
        json!({
            "model": self.model,
            "stream": stream,
            "messages": messages,
        })
    }

    /// Starts a streaming completion and returns the ordered message stream.
    ///
    /// A non-success response fails here, before any element is produced;
    /// failures after the stream has started surface as its terminal error.
    ///
    /// # Errors
    ///
    /// Returns a status-mapped upstream error or a transport error.
    pub async fn stream_chat(&self, prompt: &str, options: &ChatOptions) -> Result<ChatStream> {
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt, options, true))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RelayError::from_status(status.as_u16(), body));
        }
        Ok(sse::message_stream(
            resp.bytes_stream(),
            options.parent_message_id.clone(),
        ))
    }

    /// Single-shot completion used by the legacy `/chat` route.
    ///
    /// # Errors
    ///
    /// Returns a status-mapped upstream error, a transport error, or
    /// [`RelayError::UpstreamProtocol`] if the response lacks a message body.
    pub async fn chat_once(&self, prompt: &str, options: &ChatOptions) -> Result<ChatMessage> {
        let resp = self
            .http
            .post(&self.endpoint)
            .timeout(self.timeout)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt, options, false))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RelayError::from_status(status.as_u16(), body));
        }

        let body: Value = resp.json().await?;
        let text = body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                RelayError::UpstreamProtocol("missing choices[0].message.content".into())
            })?;
        Ok(ChatMessage {
            id: body
                .get("id")
                .and_then(Value::as_str)
                .map_or_else(|| uuid::Uuid::new_v4().to_string(), str::to_string),
            role: "assistant".to_string(),
            text: text.to_string(),
            delta: None,
            parent_message_id: options.parent_message_id.clone(),
            finish_reason: body
                .pointer("/choices/0/finish_reason")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_blank_key() {
        let config = Config::default();
        assert!(matches!(
            UpstreamClient::new("", &config),
            Err(RelayError::UpstreamAuth(_))
        ));
        assert!(matches!(
            UpstreamClient::new("  ", &config),
            Err(RelayError::UpstreamAuth(_))
        ));
    }

    #[test]
    fn test_rejects_key_with_control_chars() {
        let config = Config::default();
        assert!(matches!(
            UpstreamClient::new("sk-abc\ndef", &config),
            Err(RelayError::UpstreamAuth(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_proxy_url() {
        let config = Config {
            socks_proxy: Some("not a url".into()),
            ..Config::default()
        };
        assert!(matches!(
            UpstreamClient::new("sk-test", &config),
            Err(RelayError::Config(_))
        ));
    }

    #[test]
    fn test_construction_uses_config_model_and_endpoint() {
        let config = Config {
            openai_api_model: "gpt-4o".into(),
            api_reverse_proxy: Some("https://relay.example/v1/chat".into()),
            ..Config::default()
        };
        let client = UpstreamClient::new("sk-test", &config).unwrap();
        assert_eq!(client.model_name(), "gpt-4o");
        assert_eq!(client.endpoint, "https://relay.example/v1/chat");
    }

    #[test]
    fn test_request_body_includes_system_message() {
        let client = UpstreamClient::new("sk-test", &Config::default()).unwrap();
        let opts = ChatOptions {
            api_key: "sk-test".into(),
            system_message: Some("be terse".into()),
            ..ChatOptions::default()
        };
        let body = client.request_body("hi", &opts, true);
        assert_eq!(body["stream"], true);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["content"], "hi");
    }
}
