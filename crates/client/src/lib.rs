//! Upstream client adapter and credential cache.
//!
//! Wraps the provider's chat-completions API behind [`UpstreamClient`]
//! (construct once per key, then stream or single-shot) and keeps the
//! per-credential handles in a process-wide [`KeyCache`].

mod cache;
mod sse;
mod upstream;

pub use cache::KeyCache;
pub use upstream::UpstreamClient;
