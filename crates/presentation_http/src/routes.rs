//! Route definitions

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};

use crate::{handlers, middleware::request_id::request_id, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let audio_limit = state.config.server.max_body_size_audio_bytes;

    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Outbound sends
        .route("/api/send", post(handlers::send::send_text))
        .route(
            "/api/send_audio",
            post(handlers::send::send_audio).layer(DefaultBodyLimit::max(audio_limit)),
        )
        .layer(middleware::from_fn(request_id))
        .with_state(state)
}
