//! Chat domain.
//!
//! - [`entities::Message`] - one immutable transcript entry
//! - [`entities::ChatSession`] - a negotiated operator session
//! - [`frame`] - socket wire frames
//! - [`assistant::AssistantRequest`] - assistant endpoint request body
//! - [`store::MessageStore`] - per-channel transcripts
//! - [`visibility::ChannelVisibility`] - which surface is on screen

pub mod assistant;
pub mod entities;
pub mod frame;
pub mod store;
pub mod visibility;
