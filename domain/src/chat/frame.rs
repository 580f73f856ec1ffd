//! Wire frames exchanged over the operator session socket.
//!
//! Inbound frames carry a `type` discriminator (`history` or `text`);
//! outbound frames are bare `{ user, text, timestamp }` objects.

use super::entities::{Channel, Message};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors decoding an inbound socket frame.
///
/// Never fatal: the state machine drops the frame and keeps the socket open.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    #[error("Unknown frame type: {0}")]
    UnknownFrameType(String),
}

/// One chat record as the operator server encodes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub user: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl WireMessage {
    /// Convert into a human-channel transcript entry
    pub fn into_message(self) -> Message {
        Message::new(self.user, self.text, self.timestamp, Channel::Human)
    }
}

/// A decoded server→client frame
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InboundFrame {
    /// Past messages, sent once right after the socket opens
    History { messages: Vec<WireMessage> },
    /// A single live message
    Text(WireMessage),
}

impl InboundFrame {
    /// Decode a text frame.
    ///
    /// Distinguishes an unknown `type` from a structurally broken payload so
    /// the two can be logged differently.
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| DecodeError::MalformedFrame(e.to_string()))?;

        match value.get("type").and_then(|t| t.as_str()) {
            Some("history") | Some("text") => {}
            Some(other) => return Err(DecodeError::UnknownFrameType(other.to_string())),
            None => {
                return Err(DecodeError::MalformedFrame(
                    "missing `type` discriminator".to_string(),
                ));
            }
        }

        serde_json::from_value(value).map_err(|e| DecodeError::MalformedFrame(e.to_string()))
    }
}

/// A client→server frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundFrame {
    pub user: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl OutboundFrame {
    /// Wrap visitor input, returning `None` for blank input.
    pub fn compose(user: &str, input: &str, timestamp: DateTime<Utc>) -> Option<Self> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            user: user.to_string(),
            text: text.to_string(),
            timestamp,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
