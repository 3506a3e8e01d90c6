//! HTTP relay layer — axum router, route handlers, auth gate, and the
//! newline-framed streaming bridge to the upstream provider.
//!
//! Every route is mounted both unprefixed and under `/api`, mirroring the
//! original deployment, and all responses allow any origin.

mod auth;
mod chat;
mod error;
mod keys;
mod session;
pub mod stream;

pub use auth::authorize;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use chatrelay_client::KeyCache;
use chatrelay_config::Config;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state passed to all route handlers.
pub struct AppState {
    /// Server configuration (secret, model, proxy settings).
    pub config: Arc<Config>,
    /// Per-credential upstream handles, shared for the process lifetime.
    pub keys: KeyCache,
}

impl AppState {
    /// Creates the shared application state wrapped in an `Arc`.
    #[must_use]
    pub fn new(config: Config) -> Arc<Self> {
        let config = Arc::new(config);
        Arc::new(Self {
            keys: KeyCache::new(Arc::clone(&config)),
            config,
        })
    }
}

/// Build the full axum router.
///
/// Routes (also mounted under `/api`):
/// - POST /chat           legacy single-shot completion
/// - POST /keyLogin       warm the credential cache
/// - GET  /keyList        obfuscated cache listing (diagnostic)
/// - POST /chat-process   newline-framed streaming completion
/// - POST /config         runtime settings (behind the auth gate)
/// - POST /session        auth requirement + active model
/// - POST /verify         secret check
pub fn make_router(state: Arc<AppState>) -> Router {
    let routes = api_routes(state);
    Router::new()
        .merge(routes.clone())
        .nest("/api", routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/chat", post(chat::chat))
        .route("/keyLogin", post(keys::key_login))
        .route("/keyList", get(keys::key_list))
        .route("/chat-process", post(chat::chat_process))
        .route(
            "/config",
            post(session::runtime_config)
                .layer(middleware::from_fn_with_state(state.clone(), auth::auth_gate)),
        )
        .route("/session", post(session::session))
        .route("/verify", post(session::verify))
        .with_state(state)
}
