//! Operator session socket over `tokio-tungstenite`.
//!
//! [`WebSocketConnector`] opens `{ws-base}/api/chat/session/{sessionId}` and
//! returns split writer/reader halves ready for use in `tokio::select!`
//! loops. Ping frames are answered by tungstenite itself; binary frames are
//! skipped.

use crate::http::Endpoints;
use async_trait::async_trait;
use duochat_application::{ChatSocketConnector, FrameSink, FrameSource, SocketHalves, TransportError};
use duochat_domain::SessionId;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::debug;

/// Concrete WebSocket stream type (avoids repeating the generic everywhere).
type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

fn transport_error(e: tungstenite::Error) -> TransportError {
    match e {
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
            TransportError::Closed(e.to_string())
        }
        tungstenite::Error::Io(io) => TransportError::Io(io.to_string()),
        other => TransportError::Closed(other.to_string()),
    }
}

/// Write half of an operator session socket.
pub struct WsFrameSink {
    sink: SplitSink<WsStream, Message>,
}

#[async_trait]
impl FrameSink for WsFrameSink {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.sink
            .send(Message::Text(text))
            .await
            .map_err(transport_error)
    }

    /// Send a close frame and flush the sink.
    async fn close(&mut self) -> Result<(), TransportError> {
        self.sink.close().await.map_err(transport_error)
    }
}

/// Read half of an operator session socket.
pub struct WsFrameSource {
    stream: SplitStream<WsStream>,
}

#[async_trait]
impl FrameSource for WsFrameSource {
    async fn next_frame(&mut self) -> Option<Result<String, TransportError>> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Some(Ok(text)),
                Some(Ok(Message::Binary(data))) => {
                    debug!(len = data.len(), "Ignoring binary frame");
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => {}
                Some(Ok(Message::Close(frame))) => {
                    match frame {
                        Some(frame) => {
                            debug!(code = u16::from(frame.code), reason = %frame.reason, "Peer closed socket")
                        }
                        None => debug!("Peer closed socket"),
                    }
                    return None;
                }
                Some(Err(e)) => return Some(Err(transport_error(e))),
                None => return None,
            }
        }
    }
}

/// Opens operator session sockets for one chat server
#[derive(Debug, Clone)]
pub struct WebSocketConnector {
    endpoints: Endpoints,
}

impl WebSocketConnector {
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }
}

#[async_trait]
impl ChatSocketConnector for WebSocketConnector {
    async fn connect(&self, session_id: &SessionId) -> Result<SocketHalves, TransportError> {
        let url = self.endpoints.session_url(session_id);
        debug!(%url, "Opening session socket");

        let (ws_stream, _response) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(|e| TransportError::ConnectFailed(format!("{url}: {e}")))?;
        let (sink, stream) = ws_stream.split();

        Ok((
            Box::new(WsFrameSink { sink }),
            Box::new(WsFrameSource { stream }),
        ))
    }
}
