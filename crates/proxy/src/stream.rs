//! Frames a message stream for the `/chat-process` response body.
//!
//! The first message is written as one JSON unit; every later frame gets a
//! single `\n` prefix. JSON string escaping guarantees no raw newline inside
//! a frame, so clients can split the body on line breaks. When the inner
//! stream fails after k messages, exactly one error frame follows and the
//! body ends; dropping the body drops the inner stream, which cancels the
//! upstream request.

use bytes::Bytes;
use chatrelay_types::{ChatMessage, RelayError, ResponsePayload};
use futures_util::{Stream, StreamExt as _, stream::unfold};
use std::convert::Infallible;
use std::pin::Pin;

struct FrameState<S> {
    inner: Pin<Box<S>>,
    first: bool,
    done: bool,
}

/// Converts a fallible [`ChatMessage`] stream into newline-framed body chunks.
pub fn frame_messages<S>(messages: S) -> impl Stream<Item = Result<Bytes, Infallible>> + Send
where
    S: Stream<Item = Result<ChatMessage, RelayError>> + Send + 'static,
{
    let state = FrameState {
        inner: Box::pin(messages),
        first: true,
        done: false,
    };
    unfold(state, |mut s| async move {
        if s.done {
            return None;
        }
        let encoded = match s.inner.next().await? {
            Ok(msg) => match serde_json::to_vec(&msg) {
                Ok(bytes) => bytes,
                Err(e) => {
                    s.done = true;
                    tracing::warn!(error = %e, "failed to encode chat message");
                    encode_error(&RelayError::Serialization(e))
                }
            },
            Err(e) => {
                s.done = true;
                tracing::warn!(error = %e, "upstream stream failed mid-flight");
                encode_error(&e)
            }
        };
        let frame = if s.first {
            s.first = false;
            Bytes::from(encoded)
        } else {
            let mut framed = Vec::with_capacity(encoded.len() + 1);
            framed.push(b'\n');
            framed.extend_from_slice(&encoded);
            Bytes::from(framed)
        };
        Some((Ok(frame), s))
    })
}

/// Encodes one terminal error frame (`{status:"Fail", message, data:null}`).
fn encode_error(e: &RelayError) -> Vec<u8> {
    let payload: ResponsePayload<()> = ResponsePayload::fail(e.to_string());
    // ResponsePayload serialization cannot fail.
    serde_json::to_vec(&payload).unwrap_or_default()
}

/// A standalone single-frame body for failures before the stream starts.
#[must_use]
pub fn error_frame(e: &RelayError) -> Bytes {
    Bytes::from(serde_json::to_vec(&serde_json::json!({"error": e.to_string()})).unwrap_or_default())
}
