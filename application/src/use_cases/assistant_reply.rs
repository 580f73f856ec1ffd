//! Assistant reply task
//!
//! Reads one streamed assistant response through a [`StreamDecoder`] that
//! this task owns exclusively, reporting increments as they complete and
//! one outcome at the end.

use super::chat_controller::ChannelEvent;
use crate::ports::assistant_stream::{AssistantRequestError, AssistantStreamPort};
use crate::ports::chat_socket::TransportError;
use chrono::Utc;
use duochat_domain::{AssistantRequest, Message, StreamDecoder};
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// How one assistant request ended
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyOutcome {
    /// Natural end of stream; the full reply
    Completed(Message),
    /// The body failed mid-stream. `partial` holds whatever text had been
    /// reassembled, if any.
    Interrupted {
        partial: Option<Message>,
        error: TransportError,
    },
    /// The response never started
    Rejected(AssistantRequestError),
    /// Torn down by the controller; nothing is finalized
    Cancelled,
}

/// What the reply task observed
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantEvent {
    Increment(String),
    Finished(ReplyOutcome),
}

/// Send `request` and decode the reply, calling `on_increment` for every
/// completed text fragment.
///
/// Cancellation is checked before every chunk; once it fires no further
/// increments are reported and the decoder is never finalized.
pub async fn read_reply<F>(
    port: &dyn AssistantStreamPort,
    request: &AssistantRequest,
    cancel: &CancellationToken,
    mut on_increment: F,
) -> ReplyOutcome
where
    F: FnMut(String),
{
    let opened = tokio::select! {
        biased;
        _ = cancel.cancelled() => return ReplyOutcome::Cancelled,
        result = port.open(request) => result,
    };
    let mut body = match opened {
        Ok(body) => body,
        Err(e) => return ReplyOutcome::Rejected(e),
    };

    let mut decoder = StreamDecoder::new();
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return ReplyOutcome::Cancelled,
            next = body.next() => next,
        };

        match next {
            Some(Ok(chunk)) => {
                for increment in decoder.feed(&chunk) {
                    on_increment(increment);
                }
            }
            Some(Err(error)) => {
                let partial = if decoder.chunks_seen() > 0 {
                    decoder.finish(Utc::now()).and_then(|(tail, message)| {
                        tail.into_iter().for_each(&mut on_increment);
                        (!message.text().is_empty()).then_some(message)
                    })
                } else {
                    None
                };
                return ReplyOutcome::Interrupted { partial, error };
            }
            None => {
                let (tail, message) = decoder.finish(Utc::now()).unwrap_or_else(|| {
                    (
                        Vec::new(),
                        Message::assistant(decoder.accumulated_text(), Utc::now()),
                    )
                });
                tail.into_iter().for_each(&mut on_increment);
                debug!(
                    chunks = decoder.chunks_seen(),
                    chars = message.text().chars().count(),
                    "Assistant reply complete"
                );
                return ReplyOutcome::Completed(message);
            }
        }
    }
}

/// Spawn a task that runs [`read_reply`] and posts its observations to the
/// controller, tagged with `request_id`.
pub fn spawn_assistant_reply(
    port: Arc<dyn AssistantStreamPort>,
    request: AssistantRequest,
    request_id: u64,
    events: mpsc::UnboundedSender<ChannelEvent>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let emit = |event: AssistantEvent| {
            if events
                .send(ChannelEvent::Assistant { request_id, event })
                .is_err()
            {
                debug!(request_id, "Controller gone; dropping assistant event");
            }
        };

        let outcome = read_reply(port.as_ref(), &request, &cancel, |increment| {
            emit(AssistantEvent::Increment(increment))
        })
        .await;

        match &outcome {
            ReplyOutcome::Cancelled => {
                debug!(request_id, "Assistant request cancelled");
                return;
            }
            ReplyOutcome::Rejected(e) => warn!(request_id, error = %e, "Assistant request rejected"),
            ReplyOutcome::Interrupted { error, .. } => {
                warn!(request_id, error = %error, "Assistant stream interrupted")
            }
            ReplyOutcome::Completed(_) => {}
        }
        emit(AssistantEvent::Finished(outcome));
    })
}
