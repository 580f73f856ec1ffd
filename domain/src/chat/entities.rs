//! Chat domain entities

use crate::core::identity::{Department, SessionId, UserName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Author name carried by assistant replies
pub const ASSISTANT_AUTHOR: &str = "assistant";

/// Author name carried by notices the client generates itself
pub const SYSTEM_AUTHOR: &str = "system";

/// The two chat surfaces sharing one UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Visitor ↔ human operator over the session socket
    Human,
    /// Visitor ↔ automated assistant over a streamed HTTP response
    Assistant,
}

impl Channel {
    /// The channel that cannot be open at the same time as this one
    pub fn other(self) -> Channel {
        match self {
            Channel::Human => Channel::Assistant,
            Channel::Assistant => Channel::Human,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Human => f.write_str("human"),
            Channel::Assistant => f.write_str("assistant"),
        }
    }
}

/// A message in a transcript (Entity)
///
/// Immutable once created: corrections are new messages, never edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    author: String,
    text: String,
    timestamp: DateTime<Utc>,
    channel: Channel,
}

impl Message {
    pub fn new(
        author: impl Into<String>,
        text: impl Into<String>,
        timestamp: DateTime<Utc>,
        channel: Channel,
    ) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
            timestamp,
            channel,
        }
    }

    /// A completed assistant reply
    pub fn assistant(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self::new(ASSISTANT_AUTHOR, text, timestamp, Channel::Assistant)
    }

    /// A client-generated notice shown inline in a channel's transcript
    pub fn notice(channel: Channel, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self::new(SYSTEM_AUTHOR, text, timestamp, channel)
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn is_from_assistant(&self) -> bool {
        self.channel == Channel::Assistant && self.author == ASSISTANT_AUTHOR
    }

    pub fn is_notice(&self) -> bool {
        self.author == SYSTEM_AUTHOR
    }
}

/// An operator chat session (Entity)
///
/// Exists only between a successful negotiation and the closing of the
/// socket it addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSession {
    session_id: SessionId,
    user: UserName,
    topic: Department,
}

impl ChatSession {
    pub fn new(session_id: SessionId, user: UserName, topic: Department) -> Self {
        Self {
            session_id,
            user,
            topic,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn user(&self) -> &UserName {
        &self.user
    }

    pub fn topic(&self) -> Department {
        self.topic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_channel_other() {
        assert_eq!(Channel::Human.other(), Channel::Assistant);
        assert_eq!(Channel::Assistant.other(), Channel::Human);
    }

    #[test]
    fn test_assistant_message_author() {
        let msg = Message::assistant("ABC", ts());
        assert!(msg.is_from_assistant());
        assert!(!msg.is_notice());
        assert_eq!(msg.channel(), Channel::Assistant);
    }

    #[test]
    fn test_notice_is_not_assistant_reply() {
        let msg = Message::notice(Channel::Assistant, "assistant is unavailable", ts());
        assert!(msg.is_notice());
        assert!(!msg.is_from_assistant());
    }

    #[test]
    fn test_chat_session_accessors() {
        let session = ChatSession::new(
            SessionId::new("abc123").unwrap(),
            UserName::new("Ana").unwrap(),
            Department::Sales,
        );
        assert_eq!(session.session_id().as_str(), "abc123");
        assert_eq!(session.user().as_str(), "Ana");
        assert_eq!(session.topic(), Department::Sales);
    }
}
