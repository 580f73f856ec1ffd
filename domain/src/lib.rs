//! Domain layer for duochat
//!
//! This crate contains the chat entities, wire frames, and the two pieces
//! of the client with real protocol semantics. It has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Channels
//!
//! - **Human**: visitor ↔ operator over a session-scoped socket, driven by
//!   the [`ConnectionStateMachine`]
//! - **Assistant**: visitor ↔ automated assistant over a streamed HTTP
//!   response, reassembled by the [`StreamDecoder`]
//!
//! At most one channel is visible at a time ([`ChannelVisibility`]); each
//! keeps its own transcript in the [`MessageStore`].

pub mod chat;
pub mod connection;
pub mod core;
pub mod stream;

// Re-export commonly used types
pub use chat::{
    assistant::{AssistantRequest, AssistantTurn, TurnPart, TurnRole},
    entities::{ASSISTANT_AUTHOR, Channel, ChatSession, Message, SYSTEM_AUTHOR},
    frame::{DecodeError, InboundFrame, OutboundFrame, WireMessage},
    store::MessageStore,
    visibility::ChannelVisibility,
};
pub use connection::state::{
    ConnectionState, ConnectionStateMachine, DroppedFrame, FrameOutcome,
};
pub use core::{
    error::DomainError,
    identity::{Department, SessionId, UserName},
    string::{preview, truncate},
};
pub use stream::decoder::{StreamAssembly, StreamDecoder};
