//! Configuration loading for the chatrelay service.
//!
//! Uses figment to merge defaults, an optional YAML file, and the small set
//! of environment variables the original deployment recognized
//! (`AUTH_SECRET_KEY`, `OPENAI_API_MODEL`, `TIMEOUT_MS`, proxy settings).

pub mod schema;

pub use schema::Config;
