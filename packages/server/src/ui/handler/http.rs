//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::http::{HealthDto, HubStatsDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto::ok())
}

/// Registry diagnostics
pub async fn hub_stats(State(state): State<Arc<AppState>>) -> Json<HubStatsDto> {
    Json(HubStatsDto {
        connected_clients: state.hub.client_count().await,
    })
}
