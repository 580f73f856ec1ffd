//! Operator session socket port
//!
//! The socket is split into a write half ([`FrameSink`]) and a read half
//! ([`FrameSource`]) so the session task can wait on both in one
//! `tokio::select!` loop.

use async_trait::async_trait;
use duochat_domain::SessionId;
use thiserror::Error;

/// Errors on the operator socket or the assistant stream.
///
/// Any of these moves the affected channel back to its pre-connection view.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    ConnectFailed(String),

    #[error("Connection closed: {0}")]
    Closed(String),

    #[error("I/O error: {0}")]
    Io(String),
}

/// Write half of an operator session socket
#[async_trait]
pub trait FrameSink: Send {
    /// Send one text frame
    async fn send_text(&mut self, text: String) -> Result<(), TransportError>;

    /// Close the socket from the client side
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Read half of an operator session socket
#[async_trait]
pub trait FrameSource: Send {
    /// Next text frame, or `None` once the socket has closed normally.
    ///
    /// Control and binary frames are handled or skipped by the adapter.
    async fn next_frame(&mut self) -> Option<Result<String, TransportError>>;
}

/// Both halves of an open socket
pub type SocketHalves = (Box<dyn FrameSink>, Box<dyn FrameSource>);

/// Opens operator session sockets.
///
/// Resolving successfully means the socket is ready: the caller treats the
/// return as the `Connecting → Active` signal.
#[async_trait]
pub trait ChatSocketConnector: Send + Sync {
    async fn connect(&self, session_id: &SessionId) -> Result<SocketHalves, TransportError>;
}
