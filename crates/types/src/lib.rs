//! Core types for the chatrelay workspace.
//!
//! Defines the shared error enum, the wire-level chat data model, and the
//! status-in-body response envelope used across all layers of the relay.

pub mod chat;
pub mod error;
pub mod payload;

pub use chat::{ChatMessage, ChatOptions, ChatProcessRequest, ChatStream, RuntimeConfig};
pub use error::{RelayError, Result};
pub use payload::{ResponsePayload, ResponseStatus};
