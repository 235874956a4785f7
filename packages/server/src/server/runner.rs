//! Server runner.

use std::{future::Future, sync::Arc};

use tokio::net::TcpListener;
use tracing::Dispatch;

use super::{ServerConfig, ServerError, signal::shutdown_signal};
use crate::{
    hub::Hub,
    ui::{AppState, build_router},
};

/// Run the server described by `config` until Ctrl-C or SIGTERM.
///
/// `dispatch` is the logger the hub and every client task write to.
pub async fn run(config: ServerConfig, dispatch: Dispatch) -> Result<(), ServerError> {
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    let hub = Hub::spawn_with_dispatch(config.hub_config(), dispatch);
    serve(listener, hub, shutdown_signal()).await
}

/// Serve the router on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, hub: Hub, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = Arc::new(AppState::new(hub));
    let app = build_router(state);

    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "listening");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("server stopped");
    Ok(())
}
