use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::trace::TraceLayer;

use super::app_state::AppState;
use super::slash;

/// Slash command payloads are a handful of short form fields.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build the axum router. Every path and method reaches the slash command handler.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(slash::slash_command)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
