//! HTTP surface of the diary service: handlers plus the route table. The
//! server binary adds CORS and tracing layers on top.

pub mod advice;
pub mod auth;
pub mod diary;
pub mod error;
pub mod events;
pub mod middleware;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use crate::auth::AppState;
use crate::middleware::require_auth;

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/health", get(health));

    let protected_routes = Router::new()
        .route("/me/view", get(diary::get_view))
        .route("/diary", post(diary::submit_diary))
        .route("/threads/{thread_id}/messages", get(diary::get_messages))
        .route(
            "/threads/{thread_id}/messages/{message_id}/advice",
            post(advice::submit_advice),
        )
        .route("/events", get(events::stream_events))
        .layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

/// GET /health: liveness check (no auth).
async fn health() -> &'static str {
    "ok"
}
