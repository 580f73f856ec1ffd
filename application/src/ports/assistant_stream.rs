//! Assistant stream port
//!
//! Opens the streamed assistant response and hands back its body as raw
//! byte chunks. Chunk boundaries carry no meaning; reassembly is the
//! [`StreamDecoder`](duochat_domain::StreamDecoder)'s job.

use super::chat_socket::TransportError;
use async_trait::async_trait;
use duochat_domain::AssistantRequest;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;

/// Raw body chunks of one assistant response
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, TransportError>> + Send>>;

/// Errors that prevent the assistant response from starting
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssistantRequestError {
    #[error("Assistant request rejected (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Assistant request failed: {0}")]
    Transport(String),
}

#[async_trait]
pub trait AssistantStreamPort: Send + Sync {
    /// Send the request and return the body stream once a success status
    /// has been received.
    async fn open(&self, request: &AssistantRequest) -> Result<ChunkStream, AssistantRequestError>;
}
