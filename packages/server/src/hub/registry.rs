//! The set of live clients and the fan-out pass over it.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::mpsc::error::TrySendError;
use tracing::Instrument;
use tracing::instrument::WithSubscriber;

use super::client::Client;
use crate::domain::{ClientId, Connection, Message};

/// Why a client left the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Departure {
    /// Requested by the client's read pump.
    Unregistered,
    /// Outbound queue was full during fan-out.
    Unresponsive,
    /// Outbound queue's consumer had already gone away.
    Dead,
}

/// Registry of connected clients.
///
/// Only the hub's event loop mutates it.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    clients: HashMap<ClientId, Client>,
}

impl Registry {
    pub(crate) fn len(&self) -> usize {
        self.clients.len()
    }

    pub(crate) fn contains(&self, id: &ClientId) -> bool {
        self.clients.contains_key(id)
    }

    pub(crate) fn insert(&mut self, client: Client) {
        let id = client.id();
        self.clients.insert(id, client);
        tracing::info!(client_id = %id, clients = self.clients.len(), "client connected");
    }

    /// Remove `id` and tear it down. Absent ids are ignored.
    pub(crate) fn remove(&mut self, id: &ClientId) -> bool {
        match self.clients.remove(id) {
            Some(client) => {
                teardown(client, Departure::Unregistered, self.clients.len());
                true
            }
            None => {
                tracing::debug!(client_id = %id, "unregister for unknown client ignored");
                false
            }
        }
    }

    /// Offer `message` to every client without waiting on any of them.
    ///
    /// Clients whose queue is full or closed are evicted in the same pass.
    /// Returns the ids of the evicted clients.
    pub(crate) fn fan_out(&mut self, message: &Message) -> Vec<ClientId> {
        let mut evicted = Vec::new();
        for (id, client) in &self.clients {
            match client.try_deliver(message.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => evicted.push((*id, Departure::Unresponsive)),
                Err(TrySendError::Closed(_)) => evicted.push((*id, Departure::Dead)),
            }
        }

        evicted
            .into_iter()
            .filter_map(|(id, departure)| {
                let client = self.clients.remove(&id)?;
                teardown(client, departure, self.clients.len());
                Some(id)
            })
            .collect()
    }
}

/// Close the client's queue, then close its connection in a detached task so
/// the event loop never waits on a peer.
fn teardown(client: Client, departure: Departure, remaining: usize) {
    let id = client.id();
    let connection = client.into_connection();

    match departure {
        Departure::Unregistered => {
            tracing::info!(client_id = %id, clients = remaining, "client disconnected");
        }
        Departure::Unresponsive => {
            tracing::warn!(client_id = %id, clients = remaining, "removed unresponsive client");
        }
        Departure::Dead => {
            tracing::warn!(client_id = %id, clients = remaining, "removed dead client");
        }
    }

    let span = tracing::debug_span!("close", client_id = %id);
    tokio::spawn(close_connection(id, connection).instrument(span).with_current_subscriber());
}

pub(crate) async fn close_connection(id: ClientId, connection: Arc<dyn Connection>) {
    if let Err(e) = connection.close().await {
        tracing::warn!(client_id = %id, error = %e, "error closing connection");
    }
}
