//! Route table.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use super::{
    handler::{health_check, hub_stats, websocket_handler},
    state::AppState,
};

/// Build the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/stats", get(hub_stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
