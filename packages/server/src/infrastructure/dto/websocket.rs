//! WebSocket message DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Message, Submission};

/// Chat message sent by a client.
///
/// Missing fields decode as empty strings. Any other field, including a
/// client-supplied `timestamp`, is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IncomingChatMessage {
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub content: String,
}

impl From<IncomingChatMessage> for Submission {
    fn from(message: IncomingChatMessage) -> Self {
        Submission::new(message.sender, message.content)
    }
}

/// Chat message broadcast to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingChatMessage {
    pub sender: String,
    pub content: String,
    /// RFC 3339 (ISO 8601) UTC timestamp assigned by the hub
    pub timestamp: DateTime<Utc>,
}

impl From<&Message> for OutgoingChatMessage {
    fn from(message: &Message) -> Self {
        Self {
            sender: message.sender().to_string(),
            content: message.content().to_string(),
            timestamp: message.timestamp(),
        }
    }
}
