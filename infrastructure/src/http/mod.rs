//! HTTP adapters for the chat server
//!
//! - [`HttpSessionNegotiator`]: `POST` session negotiation
//! - [`HttpAssistantStream`]: streamed assistant replies
//! - [`Endpoints`]: URL building shared with the socket adapter

pub mod assistant;
pub mod endpoints;
pub mod negotiator;

pub use assistant::HttpAssistantStream;
pub use endpoints::{Endpoints, http_to_ws_scheme};
pub use negotiator::HttpSessionNegotiator;
