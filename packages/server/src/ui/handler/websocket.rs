//! WebSocket connection handler.

use std::sync::Arc;

use axum::{
    extract::{State, ws::WebSocketUpgrade},
    response::IntoResponse,
};

use crate::{hub::serve, infrastructure::connection::WsConnection, ui::state::AppState};

/// Upgrade the request and attach the socket to the hub.
///
/// Origins are not checked.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let hub = state.hub.clone();
    ws.on_failed_upgrade(|e| tracing::error!(error = %e, "failed to upgrade HTTP to WebSocket"))
        .on_upgrade(move |socket| async move {
            let session = serve(hub, Arc::new(WsConnection::new(socket))).await;
            let client_id = session.id();
            session.join().await;
            tracing::debug!(%client_id, "session finished");
        })
}
