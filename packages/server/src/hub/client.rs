//! Server-side representative of one connected peer.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::domain::{ClientId, ClientIdFactory, Connection, Message};

/// Consumer end of a client's outbound queue, drained by its write pump.
pub type Outbound = mpsc::Receiver<Message>;

/// One connected peer: its connection handle and the producer end of its
/// outbound queue.
///
/// `Client` is deliberately not `Clone`. The registry owns the only producer
/// end of the queue, so removing the client from the registry is what closes
/// the queue, and nothing can enqueue after that.
pub struct Client {
    id: ClientId,
    connection: Arc<dyn Connection>,
    outbound: mpsc::Sender<Message>,
}

impl Client {
    /// Create a client with an outbound queue holding up to `capacity`
    /// undelivered messages.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(connection: Arc<dyn Connection>, capacity: usize) -> (Self, Outbound) {
        let (outbound, rx) = mpsc::channel(capacity);
        let client = Self {
            id: ClientIdFactory::generate(),
            connection,
            outbound,
        };
        (client, rx)
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    /// Enqueue without waiting. Fails if the queue is full or its consumer is
    /// gone.
    pub(crate) fn try_deliver(
        &self,
        message: Message,
    ) -> Result<(), mpsc::error::TrySendError<Message>> {
        self.outbound.try_send(message)
    }

    /// Drop the producer end (closing the queue) and hand back the
    /// connection so the caller can close it.
    pub(crate) fn into_connection(self) -> Arc<dyn Connection> {
        self.connection
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").field("id", &self.id).finish()
    }
}
