//! Domain layer error definitions.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by a connection handle.
///
/// Always local to one client: they end that client's pumps and never reach
/// the hub's callers.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The connection was closed, by either side.
    #[error("connection closed")]
    Closed,

    /// The peer sent a payload that is not a valid message.
    #[error("malformed payload: {0}")]
    Decode(#[source] serde_json::Error),

    /// A message could not be serialized for the wire.
    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),

    /// The underlying transport failed.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),
}

impl ConnectionError {
    pub fn transport(error: impl Into<BoxError>) -> Self {
        Self::Transport(error.into())
    }

    /// Whether this is an orderly close rather than a failure.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}
