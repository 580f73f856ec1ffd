//! Application layer for duochat
//!
//! This crate contains the port definitions, the per-channel tasks and the
//! chat controller that wires them together. It depends only on the domain
//! layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ChatBehavior;
pub use ports::{
    assistant_stream::{AssistantRequestError, AssistantStreamPort, ChunkStream},
    chat_socket::{ChatSocketConnector, FrameSink, FrameSource, SocketHalves, TransportError},
    chat_update::ChatUpdate,
    session_negotiator::{NegotiationError, SessionNegotiator},
};
pub use use_cases::{
    assistant_reply::{ReplyOutcome, read_reply},
    channel_mediator::{ChannelIntent, ChannelMediator},
    chat_controller::{ChatCommand, ChatController, ChatPorts},
};
