//! Connection contract required from the transport.

use async_trait::async_trait;

use super::{ConnectionError, Message, Submission};

/// A ready-to-use duplex connection to one peer.
///
/// The hub never touches the wire itself: a client's read pump calls
/// [`read_message`](Connection::read_message), its write pump calls
/// [`write_message`](Connection::write_message), and any of the read pump,
/// write pump or hub eviction may call [`close`](Connection::close).
/// Implementations must therefore make `close` idempotent and safe to call
/// concurrently, and a close must wake any read or write suspended on the
/// connection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Connection: Send + Sync {
    /// Wait for the next message from the peer.
    async fn read_message(&self) -> Result<Submission, ConnectionError>;

    /// Send one message to the peer.
    async fn write_message(&self, message: &Message) -> Result<(), ConnectionError>;

    /// Close the connection. Calling this more than once returns `Ok(())`.
    async fn close(&self) -> Result<(), ConnectionError>;
}
