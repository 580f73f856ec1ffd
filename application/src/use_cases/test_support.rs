//! In-memory fake ports shared by the use-case tests.

use crate::ports::assistant_stream::{AssistantRequestError, AssistantStreamPort, ChunkStream};
use crate::ports::chat_socket::{
    ChatSocketConnector, FrameSink, FrameSource, SocketHalves, TransportError,
};
use crate::ports::session_negotiator::{NegotiationError, SessionNegotiator};
use async_trait::async_trait;
use duochat_domain::{AssistantRequest, Department, SessionId, UserName};
use futures::stream::{self, StreamExt};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// Receive the next item or fail the test after two seconds
pub async fn next_event<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> T {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("channel closed")
}

pub struct ScriptedNegotiator {
    results: Mutex<VecDeque<Result<SessionId, NegotiationError>>>,
    calls: Mutex<Vec<(String, Department)>>,
}

impl ScriptedNegotiator {
    pub fn new(results: Vec<Result<SessionId, NegotiationError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn accepting(session_id: &str) -> Self {
        Self::new(vec![Ok(SessionId::new(session_id).unwrap())])
    }

    pub fn failing(error: NegotiationError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn calls(&self) -> Vec<(String, Department)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionNegotiator for ScriptedNegotiator {
    async fn negotiate(
        &self,
        user: &UserName,
        department: Department,
    ) -> Result<SessionId, NegotiationError> {
        self.calls
            .lock()
            .unwrap()
            .push((user.as_str().to_string(), department));
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(NegotiationError::Transport("no scripted result".to_string())))
    }
}

struct ChannelSink {
    sent: mpsc::UnboundedSender<String>,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl FrameSink for ChannelSink {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.sent
            .send(text)
            .map_err(|_| TransportError::Closed("server end dropped".to_string()))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

struct ChannelSource {
    frames: mpsc::UnboundedReceiver<Result<String, TransportError>>,
}

#[async_trait]
impl FrameSource for ChannelSource {
    async fn next_frame(&mut self) -> Option<Result<String, TransportError>> {
        self.frames.recv().await
    }
}

/// Connector handing out one socket whose far end the test controls
pub struct FakeConnector {
    halves: Mutex<Option<SocketHalves>>,
    connected: Arc<Mutex<Option<String>>>,
}

/// The operator-server end of a [`FakeConnector`] socket
pub struct ServerEnd {
    frames: Option<mpsc::UnboundedSender<Result<String, TransportError>>>,
    sent: mpsc::UnboundedReceiver<String>,
    closed: Arc<AtomicBool>,
    connected: Arc<Mutex<Option<String>>>,
}

impl FakeConnector {
    pub fn new() -> (Self, ServerEnd) {
        let (frames_tx, frames_rx) = mpsc::unbounded_channel();
        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));
        let connected = Arc::new(Mutex::new(None));

        let sink: Box<dyn FrameSink> = Box::new(ChannelSink {
            sent: sent_tx,
            closed: closed.clone(),
        });
        let source: Box<dyn FrameSource> = Box::new(ChannelSource { frames: frames_rx });

        let connector = Self {
            halves: Mutex::new(Some((sink, source))),
            connected: connected.clone(),
        };
        let server = ServerEnd {
            frames: Some(frames_tx),
            sent: sent_rx,
            closed,
            connected,
        };
        (connector, server)
    }

    pub fn refusing() -> Self {
        Self {
            halves: Mutex::new(None),
            connected: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl ChatSocketConnector for FakeConnector {
    async fn connect(&self, session_id: &SessionId) -> Result<SocketHalves, TransportError> {
        let halves = self
            .halves
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| TransportError::ConnectFailed("connection refused".to_string()))?;
        *self.connected.lock().unwrap() = Some(session_id.as_str().to_string());
        Ok(halves)
    }
}

impl ServerEnd {
    pub fn push_frame(&self, text: &str) {
        if let Some(frames) = &self.frames {
            frames.send(Ok(text.to_string())).unwrap();
        }
    }

    pub fn push_error(&self, error: TransportError) {
        if let Some(frames) = &self.frames {
            frames.send(Err(error)).unwrap();
        }
    }

    /// Close the socket from the server side
    pub fn hang_up(&mut self) {
        self.frames = None;
    }

    pub async fn next_sent(&mut self) -> Option<String> {
        tokio::time::timeout(Duration::from_secs(2), self.sent.recv())
            .await
            .ok()
            .flatten()
    }

    pub fn try_sent(&mut self) -> Option<String> {
        self.sent.try_recv().ok()
    }

    pub fn sink_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn connected_to(&self) -> Option<String> {
        self.connected.lock().unwrap().clone()
    }
}

/// One scripted assistant response
pub enum Script {
    Reject(AssistantRequestError),
    Chunks(Vec<Result<Vec<u8>, TransportError>>),
    /// Deliver these chunks, then never end
    ChunksThenHang(Vec<Vec<u8>>),
}

impl Script {
    pub fn chunks(parts: &[&[u8]]) -> Self {
        Script::Chunks(parts.iter().map(|p| Ok(p.to_vec())).collect())
    }
}

pub struct ScriptedAssistant {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<AssistantRequest>>,
}

impl ScriptedAssistant {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<AssistantRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssistantStreamPort for ScriptedAssistant {
    async fn open(&self, request: &AssistantRequest) -> Result<ChunkStream, AssistantRequestError> {
        self.requests.lock().unwrap().push(request.clone());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Script::Reject(AssistantRequestError::Transport("no script".to_string())));

        match script {
            Script::Reject(e) => Err(e),
            Script::Chunks(chunks) => Ok(stream::iter(chunks).boxed()),
            Script::ChunksThenHang(chunks) => Ok(stream::iter(chunks.into_iter().map(Ok::<Vec<u8>, TransportError>))
                .chain(stream::pending())
                .boxed()),
        }
    }
}
