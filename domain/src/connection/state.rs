//! Connection state machine for one operator session.
//!
//! ```text
//! Disconnected ──begin()──▶ Connecting ──on_open()──▶ Active ──on_closed()──▶ Closed
//!        │                      │                                              ▲
//!        └──────────────────────┴──────────────── on_closed() ────────────────┘
//! ```
//!
//! `Closed` is terminal. Reconnecting means negotiating a new session and
//! driving a fresh machine.

use crate::chat::entities::{ChatSession, Message};
use crate::chat::frame::{DecodeError, InboundFrame, OutboundFrame};
use crate::core::error::DomainError;
use chrono::{DateTime, Utc};
use std::fmt;

/// Lifecycle states of an operator session socket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Active,
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Disconnected => "Disconnected",
            ConnectionState::Connecting => "Connecting",
            ConnectionState::Active => "Active",
            ConnectionState::Closed => "Closed",
        };
        f.write_str(name)
    }
}

/// Why an inbound frame did not change the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DroppedFrame {
    /// Frame arrived outside `Active`
    NotActive(ConnectionState),
    /// A second history batch for the same session
    DuplicateHistory,
    /// Payload could not be decoded
    Malformed(DecodeError),
}

/// Effect of one inbound frame on the human transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Replace the transcript with these messages
    ReplaceHistory(Vec<Message>),
    /// Append one live message
    Append(Message),
    Dropped(DroppedFrame),
}

/// State machine owning one [`ChatSession`] for its lifetime.
#[derive(Debug, Default)]
pub struct ConnectionStateMachine {
    state: ConnectionState,
    session: Option<ChatSession>,
    history_applied: bool,
}

impl ConnectionStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// The session, present from `Connecting` until the machine closes
    pub fn session(&self) -> Option<&ChatSession> {
        self.session.as_ref()
    }

    fn set_state(&mut self, next: ConnectionState) {
        self.state = next;
    }

    fn invalid(&self, event: &str) -> DomainError {
        DomainError::InvalidTransition {
            state: self.state().to_string(),
            event: event.to_string(),
        }
    }

    /// `Disconnected → Connecting` after a successful negotiation.
    pub fn begin(&mut self, session: ChatSession) -> Result<(), DomainError> {
        if self.state() != ConnectionState::Disconnected {
            return Err(self.invalid("begin"));
        }
        self.session = Some(session);
        self.set_state(ConnectionState::Connecting);
        Ok(())
    }

    /// `Connecting → Active` once the socket reports readiness.
    pub fn on_open(&mut self) -> Result<(), DomainError> {
        if self.state() != ConnectionState::Connecting {
            return Err(self.invalid("open"));
        }
        self.set_state(ConnectionState::Active);
        Ok(())
    }

    /// Apply one inbound text frame.
    ///
    /// Never changes the connection state: a frame that cannot be used is
    /// reported as [`FrameOutcome::Dropped`] and the socket stays open.
    pub fn on_frame(&mut self, raw: &str) -> FrameOutcome {
        let state = self.state();
        if state != ConnectionState::Active {
            return FrameOutcome::Dropped(DroppedFrame::NotActive(state));
        }

        match InboundFrame::decode(raw) {
            Ok(InboundFrame::History { messages }) => {
                if self.history_applied {
                    return FrameOutcome::Dropped(DroppedFrame::DuplicateHistory);
                }
                self.history_applied = true;
                FrameOutcome::ReplaceHistory(
                    messages.into_iter().map(|m| m.into_message()).collect(),
                )
            }
            Ok(InboundFrame::Text(message)) => FrameOutcome::Append(message.into_message()),
            Err(e) => FrameOutcome::Dropped(DroppedFrame::Malformed(e)),
        }
    }

    /// Move to `Closed`, destroying the session.
    ///
    /// Returns the state the machine was in, or `None` if it was already
    /// closed.
    pub fn on_closed(&mut self) -> Option<ConnectionState> {
        let previous = self.state();
        if previous == ConnectionState::Closed {
            return None;
        }
        self.session = None;
        self.set_state(ConnectionState::Closed);
        Some(previous)
    }

    /// Wrap visitor input as an outbound frame.
    ///
    /// `None` unless the machine is `Active` and the input has visible text.
    pub fn compose_outbound(&self, input: &str, now: DateTime<Utc>) -> Option<OutboundFrame> {
        if self.state() != ConnectionState::Active {
            return None;
        }
        let session = self.session.as_ref()?;
        OutboundFrame::compose(session.user().as_str(), input, now)
    }
}
