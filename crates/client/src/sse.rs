//! Decodes an upstream SSE byte stream into a [`ChatStream`].
//!
//! Each `data:` event carries one chat-completion chunk; the decoder keeps a
//! running concatenation of the delta content so every emitted [`ChatMessage`]
//! carries both the full `text` so far and the newest `delta`. The literal
//! `[DONE]` event terminates the stream.

use bytes::Bytes;
use chatrelay_types::{ChatMessage, ChatStream, RelayError};
use eventsource_stream::{Event, EventStreamError, Eventsource as _};
use futures_util::{Stream, StreamExt as _, stream::try_unfold};
use serde_json::Value;
use std::pin::Pin;

type EventResult = Result<Event, EventStreamError<RelayError>>;

struct DecodeState {
    events: Pin<Box<dyn Stream<Item = EventResult> + Send>>,
    id: String,
    text: String,
    parent_message_id: Option<String>,
    done: bool,
}

/// Adapts a raw SSE byte stream into an ordered stream of [`ChatMessage`]s.
///
/// A transport or parse failure mid-stream surfaces as the terminal stream
/// error; messages already yielded are not retracted.
pub fn message_stream<S, E>(bytes: S, parent_message_id: Option<String>) -> ChatStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Into<RelayError> + Send + 'static,
{
    let events = Box::pin(bytes.map(|r| r.map_err(Into::into)).eventsource());
    let state = DecodeState {
        events,
        id: String::new(),
        text: String::new(),
        parent_message_id,
        done: false,
    };

    Box::pin(try_unfold(state, |mut s| async move {
        loop {
            if s.done {
                return Ok(None);
            }
            match s.events.next().await {
                Some(Ok(ev)) => {
                    if ev.data == "[DONE]" {
                        s.done = true;
                        return Ok(None);
                    }
                    let chunk: Value = serde_json::from_str(&ev.data).map_err(|e| {
                        RelayError::UpstreamProtocol(format!("bad chunk: {e}"))
                    })?;
                    if let Some(id) = chunk.get("id").and_then(Value::as_str) {
                        s.id = id.to_string();
                    }
                    let delta = chunk
                        .pointer("/choices/0/delta/content")
                        .and_then(Value::as_str)
                        .map(str::to_string);
                    let finish_reason = chunk
                        .pointer("/choices/0/finish_reason")
                        .and_then(Value::as_str)
                        .map(str::to_string);
                    // Chunks carrying neither content nor a finish reason
                    // (e.g. the role-only opener) produce no message.
                    if delta.is_none() && finish_reason.is_none() {
                        continue;
                    }
                    if let Some(d) = &delta {
                        s.text.push_str(d);
                    }
                    let msg = ChatMessage {
                        id: s.id.clone(),
                        role: "assistant".to_string(),
                        text: s.text.clone(),
                        delta,
                        parent_message_id: s.parent_message_id.clone(),
                        finish_reason,
                    };
                    return Ok(Some((msg, s)));
                }
                Some(Err(EventStreamError::Transport(e))) => return Err(e),
                Some(Err(e)) => {
                    return Err(RelayError::UpstreamProtocol(e.to_string()));
                }
                // Upstream closed without [DONE]; nothing more to forward.
                None => return Ok(None),
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn sse(chunks: &[&str]) -> Vec<Result<Bytes, RelayError>> {
        chunks
            .iter()
            .map(|c| Ok(Bytes::from(format!("data: {c}\n\n"))))
            .collect()
    }

    async fn collect(items: Vec<Result<Bytes, RelayError>>) -> Vec<Result<ChatMessage, RelayError>> {
        message_stream(stream::iter(items), Some("m0".into()))
            .collect::<Vec<_>>()
            .await
    }

    #[tokio::test]
    async fn test_deltas_accumulate_in_order() {
        let items = sse(&[
            r#"{"id":"chatcmpl-1","choices":[{"delta":{"role":"assistant"}}]}"#,
            r#"{"id":"chatcmpl-1","choices":[{"delta":{"content":"Hel"}}]}"#,
            r#"{"id":"chatcmpl-1","choices":[{"delta":{"content":"lo"}}]}"#,
            r#"{"id":"chatcmpl-1","choices":[{"delta":{},"finish_reason":"stop"}]}"#,
            "[DONE]",
        ]);
        let msgs = collect(items).await;
        assert_eq!(msgs.len(), 3);
        let m1 = msgs[0].as_ref().unwrap();
        assert_eq!(m1.text, "Hel");
        assert_eq!(m1.delta.as_deref(), Some("Hel"));
        assert_eq!(m1.parent_message_id.as_deref(), Some("m0"));
        let m2 = msgs[1].as_ref().unwrap();
        assert_eq!(m2.text, "Hello");
        assert_eq!(m2.delta.as_deref(), Some("lo"));
        assert_eq!(m2.id, "chatcmpl-1");
        let m3 = msgs[2].as_ref().unwrap();
        assert_eq!(m3.finish_reason.as_deref(), Some("stop"));
        assert!(m3.delta.is_none());
        assert_eq!(m3.text, "Hello");
    }

    #[tokio::test]
    async fn test_malformed_chunk_is_terminal_protocol_error() {
        let items = sse(&[
            r#"{"id":"chatcmpl-2","choices":[{"delta":{"content":"ok"}}]}"#,
            "not json at all",
        ]);
        let msgs = collect(items).await;
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].as_ref().unwrap().text, "ok");
        assert!(matches!(msgs[1], Err(RelayError::UpstreamProtocol(_))));
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let items = vec![
            Ok(Bytes::from(
                "data: {\"id\":\"c\",\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\n",
            )),
            Err(RelayError::UpstreamUnavailable("reset".into())),
        ];
        let msgs = collect(items).await;
        assert_eq!(msgs.len(), 2);
        assert!(matches!(msgs[1], Err(RelayError::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn test_stream_ends_cleanly_without_done() {
        let items = sse(&[r#"{"id":"c","choices":[{"delta":{"content":"a"}}]}"#]);
        let msgs = collect(items).await;
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].is_ok());
    }

    #[tokio::test]
    async fn test_nothing_after_done_marker() {
        let items = sse(&[
            "[DONE]",
            r#"{"id":"c","choices":[{"delta":{"content":"late"}}]}"#,
        ]);
        let msgs = collect(items).await;
        assert!(msgs.is_empty());
    }
}
