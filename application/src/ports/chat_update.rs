//! Updates emitted by the ChatController for the presentation layer
//!
//! These events form the output port from the application layer to the
//! presentation layer. The renderer receives them on an unbounded channel and
//! draws them; it never mutates chat state itself.

use super::session_negotiator::NegotiationError;
use duochat_domain::{Channel, ChannelVisibility, ConnectionState, Department, Message, UserName};

/// Events emitted by the ChatController for the renderer
#[derive(Debug, Clone)]
pub enum ChatUpdate {
    // === Surfaces ===
    /// Which channel is on screen changed
    VisibilityChanged(ChannelVisibility),
    /// A channel went back to its pre-connection view
    ChannelReverted { channel: Channel, reason: String },

    // === Human channel ===
    /// Session request sent for this visitor
    HumanNegotiating {
        user: UserName,
        department: Department,
    },
    /// Session negotiation failed; the login view stays up
    NegotiationFailed { error: NegotiationError },
    /// Operator socket state changed
    ConnectionChanged(ConnectionState),

    // === Transcripts ===
    /// A channel's transcript was replaced wholesale
    TranscriptReplaced {
        channel: Channel,
        messages: Vec<Message>,
    },
    /// One message was appended to its channel's transcript
    MessageAppended(Message),
    /// A channel's transcript was emptied
    TranscriptCleared(Channel),

    // === Assistant channel ===
    /// Assistant request sent; waiting for the first fragment
    AssistantStarted,
    /// One decoded text increment of the reply in progress
    AssistantIncrement(String),
    /// The request in flight ended, however it ended
    AssistantFinished,

    // === Errors & Control ===
    /// A front-end command could not be applied in the current state
    CommandRejected { reason: String },
    /// The controller stopped
    Exit,
}
