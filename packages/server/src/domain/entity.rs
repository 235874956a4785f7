//! Core domain models for the message hub.

use chrono::{DateTime, Utc};

/// A message as submitted by a client, before the hub stamps it.
///
/// Neither field is validated: `sender` is whatever the peer claims and
/// `content` has no length limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub sender: String,
    pub content: String,
}

impl Submission {
    pub fn new(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
        }
    }
}

/// One chat event as broadcast by the hub.
///
/// Immutable once built. The timestamp is assigned by the hub when it
/// processes the submission, never taken from the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    sender: String,
    content: String,
    timestamp: DateTime<Utc>,
}

impl Message {
    /// Stamp a submission with the instant the hub processed it.
    pub fn stamp(submission: Submission, timestamp: DateTime<Utc>) -> Self {
        Self {
            sender: submission.sender,
            content: submission.content,
            timestamp,
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamp_keeps_submission_fields() {
        // テスト項目: スタンプ後も送信者と本文はそのまま保持される
        // given (前提条件):
        let submission = Submission::new("alice", "hello");
        let timestamp = Utc::now();

        // when (操作):
        let message = Message::stamp(submission, timestamp);

        // then (期待する結果):
        assert_eq!(message.sender(), "alice");
        assert_eq!(message.content(), "hello");
        assert_eq!(message.timestamp(), timestamp);
    }

    #[test]
    fn test_empty_sender_is_accepted() {
        let message = Message::stamp(Submission::default(), Utc::now());
        assert_eq!(message.sender(), "");
        assert_eq!(message.content(), "");
    }
}
