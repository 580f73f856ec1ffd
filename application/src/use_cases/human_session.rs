//! Operator session task
//!
//! One spawned task per human-chat session: negotiates the session, opens
//! the socket, then relays frames in both directions until the socket closes
//! or the controller cancels it. The task never touches chat state; every
//! observation is posted to the controller as a [`HumanEvent`] tagged with
//! the session generation.

use super::chat_controller::ChannelEvent;
use crate::ports::chat_socket::{ChatSocketConnector, TransportError};
use crate::ports::session_negotiator::{NegotiationError, SessionNegotiator};
use duochat_domain::{Department, SessionId, UserName, preview};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

/// What the session task observed
#[derive(Debug, Clone, PartialEq)]
pub enum HumanEvent {
    /// The negotiation request completed
    Negotiated(Result<SessionId, NegotiationError>),
    /// The socket is ready
    Opened,
    /// One inbound text frame, undecoded
    Frame(String),
    /// The socket closed or could not be opened. `None` is a normal close
    /// by the peer.
    Closed(Option<TransportError>),
}

/// Controller-side handle to a running session task
#[derive(Debug)]
pub struct HumanLink {
    outbound: mpsc::UnboundedSender<String>,
    cancel: CancellationToken,
}

impl HumanLink {
    /// Queue one serialized frame for sending.
    ///
    /// Returns `false` if the task has already ended.
    pub fn send(&self, frame: String) -> bool {
        self.outbound.send(frame).is_ok()
    }

    /// Tear the session down. The task closes the socket and posts nothing
    /// further.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Everything a session task needs to run
pub struct HumanSessionParams {
    pub negotiator: Arc<dyn SessionNegotiator>,
    pub connector: Arc<dyn ChatSocketConnector>,
    pub user: UserName,
    pub department: Department,
    pub generation: u64,
    pub events: mpsc::UnboundedSender<ChannelEvent>,
    pub cancel: CancellationToken,
}

/// Spawn the task for one session and return its handle.
pub fn spawn_human_session(params: HumanSessionParams) -> HumanLink {
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let link = HumanLink {
        outbound: outbound_tx,
        cancel: params.cancel.clone(),
    };
    tokio::spawn(run_session(params, outbound_rx));
    link
}

async fn run_session(params: HumanSessionParams, mut outbound: mpsc::UnboundedReceiver<String>) {
    let HumanSessionParams {
        negotiator,
        connector,
        user,
        department,
        generation,
        events,
        cancel,
    } = params;

    let emit = |event: HumanEvent| {
        if events
            .send(ChannelEvent::Human { generation, event })
            .is_err()
        {
            debug!(generation, "Controller gone; dropping session event");
        }
    };

    debug!(generation, user = %user, department = %department, "Negotiating session");
    let negotiated = tokio::select! {
        biased;
        _ = cancel.cancelled() => return,
        result = negotiator.negotiate(&user, department) => result,
    };
    let session_id = match negotiated {
        Ok(id) => {
            emit(HumanEvent::Negotiated(Ok(id.clone())));
            id
        }
        Err(e) => {
            emit(HumanEvent::Negotiated(Err(e)));
            return;
        }
    };

    let connected = tokio::select! {
        biased;
        _ = cancel.cancelled() => return,
        result = connector.connect(&session_id) => result,
    };
    let (mut sink, mut source) = match connected {
        Ok(halves) => halves,
        Err(e) => {
            emit(HumanEvent::Closed(Some(e)));
            return;
        }
    };
    info!(generation, session = %session_id, "Operator session open");
    emit(HumanEvent::Opened);

    let reason = loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(generation, "Session cancelled; closing socket");
                if let Err(e) = sink.close().await {
                    debug!(generation, error = %e, "Socket close failed");
                }
                return;
            }
            Some(frame) = outbound.recv() => {
                trace!(generation, frame = %preview(&frame, 120), "Sending frame");
                if let Err(e) = sink.send_text(frame).await {
                    break Some(e);
                }
            }
            frame = source.next_frame() => match frame {
                Some(Ok(text)) => {
                    trace!(generation, frame = %preview(&text, 120), "Received frame");
                    emit(HumanEvent::Frame(text));
                }
                Some(Err(e)) => break Some(e),
                None => break None,
            },
        }
    };

    match &reason {
        Some(e) => info!(generation, error = %e, "Operator session lost"),
        None => info!(generation, "Operator session closed by peer"),
    }
    if let Err(e) = sink.close().await {
        debug!(generation, error = %e, "Socket close after failure");
    }
    emit(HumanEvent::Closed(reason));
}
