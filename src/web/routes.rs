//! Router setup with all routes and middleware.

use crate::web::handlers;
use crate::web::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Create the axum Router with all routes and request tracing.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/select", post(handlers::select))
        .route("/chat", post(handlers::chat))
        .route("/reset", post(handlers::reset))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
