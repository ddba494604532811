use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Recording sessions
        .route("/api/v1/sessions", post(handlers::start_session))
        .route(
            "/api/v1/sessions/{session_id}",
            get(handlers::get_session).delete(handlers::discard_session),
        )
        .route("/api/v1/sessions/{session_id}/samples", post(handlers::append_sample))
        .route("/api/v1/sessions/{session_id}/pause", post(handlers::pause_session))
        .route("/api/v1/sessions/{session_id}/resume", post(handlers::resume_session))
        .route("/api/v1/sessions/{session_id}/stop", post(handlers::stop_session))
        .route("/api/v1/owners/{owner_id}/session", get(handlers::get_active_session))

        // Discovery
        .route("/api/v1/search", post(handlers::handle_search))
        .route("/api/v1/votes/aggregate", post(handlers::aggregate_votes))
        .route("/api/v1/votes/tally", post(handlers::tally_votes))

        .with_state(state)
}
