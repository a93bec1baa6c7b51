//! # HTTP Trigger Surface
//!
//! Stateless trigger for the flush cycle plus a basic health endpoint. The
//! orchestrator itself is trigger-agnostic; this module is just one of the
//! possible callers (a cron-like scheduler or a test harness are others).

pub mod handlers;
pub mod response_types;
pub mod state;

use axum::routing::{get, post};
use axum::Router;

pub use response_types::ApiError;
pub use state::AppState;

/// Build the relay's router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::basic_health))
        .route("/v1/outbox/flush", post(handlers::flush::process_pending_events))
        .with_state(state)
}
