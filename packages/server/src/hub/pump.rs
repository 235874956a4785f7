//! Per-client read and write loops.
//!
//! Each connected client gets two tasks: the read pump moves messages from
//! the connection to the hub, the write pump drains the client's outbound
//! queue onto the connection. Either one closes the connection when it
//! stops; the read pump is also the only client-side path that asks the hub
//! to unregister the client.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::Instrument;

use super::{Client, Hub, Outbound, registry::close_connection};
use crate::domain::{ClientId, Connection};

/// A running client: its id and the two pump tasks.
#[derive(Debug)]
pub struct Session {
    id: ClientId,
    read: JoinHandle<()>,
    write: JoinHandle<()>,
}

impl Session {
    pub fn id(&self) -> ClientId {
        self.id
    }

    /// Wait for both pumps to finish.
    pub async fn join(self) {
        for (pump, handle) in [("read", self.read), ("write", self.write)] {
            if let Err(e) = handle.await {
                tracing::error!(client_id = %self.id, pump, error = %e, "pump task failed");
            }
        }
    }
}

/// Attach `connection` to the hub.
///
/// Creates the client, waits for the hub to register it, then starts the
/// read and write pumps.
pub async fn serve(hub: Hub, connection: Arc<dyn Connection>) -> Session {
    let (client, outbound) = Client::new(Arc::clone(&connection), hub.config().outbound_capacity);
    let id = client.id();

    hub.register(client).await;

    let (read_span, write_span) = tracing::dispatcher::with_default(&hub.dispatch, || {
        (
            tracing::debug_span!("read_pump", client_id = %id),
            tracing::debug_span!("write_pump", client_id = %id),
        )
    });

    let write = hub.spawn_task(
        write_pump(id, Arc::clone(&connection), outbound).instrument(write_span),
    );
    let read = hub.spawn_task(read_pump(hub.clone(), id, connection).instrument(read_span));

    Session { id, read, write }
}

async fn read_pump(hub: Hub, id: ClientId, connection: Arc<dyn Connection>) {
    loop {
        match connection.read_message().await {
            Ok(submission) => {
                tracing::info!(
                    client_id = %id,
                    sender = %submission.sender,
                    content = %submission.content,
                    "message received"
                );
                hub.submit(submission).await;
            }
            Err(e) if e.is_closed() => {
                tracing::debug!(client_id = %id, "connection closed");
                break;
            }
            Err(e) => {
                tracing::error!(client_id = %id, error = %e, "error reading message");
                break;
            }
        }
    }

    hub.unregister(id).await;
    close_connection(id, connection).await;
}

async fn write_pump(id: ClientId, connection: Arc<dyn Connection>, mut outbound: Outbound) {
    while let Some(message) = outbound.recv().await {
        if let Err(e) = connection.write_message(&message).await {
            if e.is_closed() {
                tracing::debug!(client_id = %id, "connection closed while sending");
            } else {
                tracing::error!(client_id = %id, error = %e, "error sending message");
            }
            break;
        }
    }

    close_connection(id, connection).await;
}
