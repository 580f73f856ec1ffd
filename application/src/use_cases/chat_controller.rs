//! Chat Controller
//!
//! The single event loop of the client. Owns every piece of chat state (the
//! mediator, the transcripts, the current operator session and the assistant
//! request in flight) and mutates it one event at a time. Network work runs
//! in per-channel tasks that post [`ChannelEvent`]s back; each event carries
//! the generation or request id it belongs to, and events from a superseded
//! task are ignored.
//!
//! Emits [`ChatUpdate`]s to a channel for the presentation layer to render.

use super::assistant_reply::{AssistantEvent, ReplyOutcome, spawn_assistant_reply};
use super::channel_mediator::{ChannelIntent, ChannelMediator};
use super::human_session::{HumanEvent, HumanLink, HumanSessionParams, spawn_human_session};
use crate::config::ChatBehavior;
use crate::ports::assistant_stream::AssistantStreamPort;
use crate::ports::chat_socket::{ChatSocketConnector, TransportError};
use crate::ports::chat_update::ChatUpdate;
use crate::ports::session_negotiator::{NegotiationError, SessionNegotiator};
use chrono::Utc;
use duochat_domain::{
    AssistantRequest, Channel, ChannelVisibility, ChatSession, ConnectionState,
    ConnectionStateMachine, Department, DomainError, DroppedFrame, FrameOutcome, Message,
    MessageStore, UserName, preview,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Commands from the front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Show the human channel (login view unless a session is live)
    OpenHuman,
    /// Show the assistant channel
    OpenAssistant,
    /// Hide both channels, tearing down whatever is open
    CloseAll,
    /// Start an operator session; opens the human channel if needed
    ConnectHuman {
        user_name: String,
        department: String,
    },
    /// Send text to the operator
    SendHuman(String),
    /// Ask the assistant a question
    AskAssistant(String),
    /// The host page switched language; observed only
    LanguageChanged(String),
    Shutdown,
}

/// Observations posted by the per-channel tasks
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Human { generation: u64, event: HumanEvent },
    Assistant { request_id: u64, event: AssistantEvent },
}

/// I/O ports the controller drives
#[derive(Clone)]
pub struct ChatPorts {
    pub negotiator: Arc<dyn SessionNegotiator>,
    pub connector: Arc<dyn ChatSocketConnector>,
    pub assistant: Arc<dyn AssistantStreamPort>,
}

/// The operator session being negotiated, connecting or active
struct HumanSlot {
    generation: u64,
    user: UserName,
    department: Department,
    machine: ConnectionStateMachine,
    link: HumanLink,
}

struct InFlight {
    request_id: u64,
    cancel: CancellationToken,
}

pub struct ChatController {
    ports: ChatPorts,
    behavior: ChatBehavior,
    mediator: ChannelMediator,
    store: MessageStore,
    human: Option<HumanSlot>,
    human_generation: u64,
    in_flight: Option<InFlight>,
    next_request_id: u64,
    /// Root token; every channel task runs on a child of it
    cancellation_token: CancellationToken,
    events_tx: mpsc::UnboundedSender<ChannelEvent>,
    events_rx: mpsc::UnboundedReceiver<ChannelEvent>,
    /// Channel sender for chat updates
    tx: mpsc::UnboundedSender<ChatUpdate>,
}

impl ChatController {
    pub fn new(
        ports: ChatPorts,
        behavior: ChatBehavior,
        tx: mpsc::UnboundedSender<ChatUpdate>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            ports,
            behavior,
            mediator: ChannelMediator::new(),
            store: MessageStore::new(),
            human: None,
            human_generation: 0,
            in_flight: None,
            next_request_id: 0,
            cancellation_token: CancellationToken::new(),
            events_tx,
            events_rx,
            tx,
        }
    }

    /// Set cancellation token for graceful shutdown
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn visibility(&self) -> ChannelVisibility {
        self.mediator.visibility()
    }

    /// State of the current operator session; `Disconnected` when there is
    /// none
    pub fn human_state(&self) -> ConnectionState {
        self.human
            .as_ref()
            .map(|slot| slot.machine.state())
            .unwrap_or_default()
    }

    pub fn assistant_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Run until `Shutdown`, the command channel closes, or the
    /// cancellation token fires.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<ChatCommand>) {
        info!("Chat controller started");
        loop {
            tokio::select! {
                biased;
                _ = self.cancellation_token.cancelled() => {
                    debug!("Controller cancelled");
                    break;
                }
                command = commands.recv() => match command {
                    Some(command) => {
                        if !self.handle_command(command) {
                            break;
                        }
                    }
                    None => {
                        debug!("Command channel closed");
                        break;
                    }
                },
                Some(event) = self.events_rx.recv() => self.handle_event(event),
            }
        }
        self.shutdown();
        info!("Chat controller stopped");
    }

    /// Apply one front-end command. Returns `false` once the loop should
    /// stop.
    pub fn handle_command(&mut self, command: ChatCommand) -> bool {
        debug!(?command, "Command");
        match command {
            ChatCommand::OpenHuman => {
                let intents = self.mediator.open_human();
                self.apply_intents(intents);
            }
            ChatCommand::OpenAssistant => {
                let intents = self.mediator.open_assistant();
                self.apply_intents(intents);
            }
            ChatCommand::CloseAll => {
                let intents = self.mediator.close_all();
                self.apply_intents(intents);
            }
            ChatCommand::ConnectHuman {
                user_name,
                department,
            } => self.connect_human(&user_name, &department),
            ChatCommand::SendHuman(text) => self.send_human(&text),
            ChatCommand::AskAssistant(text) => self.ask_assistant(&text),
            ChatCommand::LanguageChanged(tag) => {
                info!(language = %tag, "Language changed");
            }
            ChatCommand::Shutdown => return false,
        }
        true
    }

    pub fn handle_event(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Human { generation, event } => self.handle_human_event(generation, event),
            ChannelEvent::Assistant { request_id, event } => {
                self.handle_assistant_event(request_id, event)
            }
        }
    }

    fn emit(&self, update: ChatUpdate) {
        if self.tx.send(update).is_err() {
            trace!("Renderer gone; dropping update");
        }
    }

    fn reject(&self, reason: impl Into<String>) {
        self.emit(ChatUpdate::CommandRejected {
            reason: reason.into(),
        });
    }

    fn append(&mut self, message: Message) {
        self.store.append(message.clone());
        self.emit(ChatUpdate::MessageAppended(message));
    }

    // ==================== Visibility ====================

    fn apply_intents(&mut self, intents: Vec<ChannelIntent>) {
        if intents.is_empty() {
            return;
        }
        for intent in intents {
            match intent {
                ChannelIntent::Close(Channel::Human) => self.close_human(),
                ChannelIntent::Close(Channel::Assistant) => self.close_assistant(),
                ChannelIntent::Open(channel) => debug!(%channel, "Channel opened"),
            }
        }
        self.emit(ChatUpdate::VisibilityChanged(self.mediator.visibility()));
    }

    /// Deliberate close: tear the session down and forget the transcript.
    fn close_human(&mut self) {
        if let Some(mut slot) = self.human.take() {
            slot.link.close();
            if let Some(previous) = slot.machine.on_closed() {
                info!(generation = slot.generation, %previous, "Operator session closed");
            }
            self.emit(ChatUpdate::ConnectionChanged(ConnectionState::Closed));
        }
        self.store.clear(Channel::Human);
        self.emit(ChatUpdate::TranscriptCleared(Channel::Human));
    }

    fn close_assistant(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            debug!(request_id = in_flight.request_id, "Cancelling assistant request");
            in_flight.cancel.cancel();
            self.emit(ChatUpdate::AssistantFinished);
        }
        self.store.clear(Channel::Assistant);
        self.emit(ChatUpdate::TranscriptCleared(Channel::Assistant));
    }

    // ==================== Human channel ====================

    fn connect_human(&mut self, user_name: &str, department: &str) {
        if self.human.is_some() {
            self.reject("a session is already connecting or active");
            return;
        }
        let intents = self.mediator.open_human();
        self.apply_intents(intents);

        let validated: Result<(UserName, Department), DomainError> =
            UserName::new(user_name).and_then(|user| Ok((user, department.parse()?)));
        let (user, department) = match validated {
            Ok(valid) => valid,
            Err(e) => {
                if e.is_input_error() {
                    debug!(error = %e, "Login rejected before negotiation");
                } else {
                    warn!(error = %e, "Login failed validation");
                }
                self.emit(ChatUpdate::NegotiationFailed {
                    error: NegotiationError::InvalidInput(e),
                });
                return;
            }
        };

        self.human_generation += 1;
        let generation = self.human_generation;
        let link = spawn_human_session(HumanSessionParams {
            negotiator: self.ports.negotiator.clone(),
            connector: self.ports.connector.clone(),
            user: user.clone(),
            department,
            generation,
            events: self.events_tx.clone(),
            cancel: self.cancellation_token.child_token(),
        });
        self.human = Some(HumanSlot {
            generation,
            user: user.clone(),
            department,
            machine: ConnectionStateMachine::new(),
            link,
        });
        self.emit(ChatUpdate::HumanNegotiating { user, department });
    }

    fn send_human(&mut self, text: &str) {
        let Some(slot) = self.human.as_ref() else {
            self.reject("not connected to an operator");
            return;
        };
        if slot.machine.state() != ConnectionState::Active {
            self.reject("the operator session is not ready yet");
            return;
        }
        let Some(frame) = slot.machine.compose_outbound(text, Utc::now()) else {
            debug!("Ignoring blank outbound message");
            return;
        };
        match frame.to_json() {
            Ok(json) => {
                if !slot.link.send(json) {
                    debug!(generation = slot.generation, "Session task already ended");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize outbound frame"),
        }
    }

    fn live_human(&mut self, generation: u64) -> Option<&mut HumanSlot> {
        self.human
            .as_mut()
            .filter(|slot| slot.generation == generation)
    }

    fn handle_human_event(&mut self, generation: u64, event: HumanEvent) {
        let Some(slot) = self.live_human(generation) else {
            debug!(generation, "Ignoring event from superseded session");
            return;
        };

        match event {
            HumanEvent::Negotiated(Ok(session_id)) => {
                let session = ChatSession::new(session_id, slot.user.clone(), slot.department);
                match slot.machine.begin(session) {
                    Ok(()) => self.emit(ChatUpdate::ConnectionChanged(ConnectionState::Connecting)),
                    Err(e) => warn!(error = %e, "Unexpected negotiation result"),
                }
            }
            HumanEvent::Negotiated(Err(error)) => {
                warn!(error = %error, "Session negotiation failed");
                self.human = None;
                self.emit(ChatUpdate::NegotiationFailed { error });
            }
            HumanEvent::Opened => match slot.machine.on_open() {
                Ok(()) => self.emit(ChatUpdate::ConnectionChanged(ConnectionState::Active)),
                Err(e) => warn!(error = %e, "Unexpected socket open"),
            },
            HumanEvent::Frame(raw) => {
                let outcome = slot.machine.on_frame(&raw);
                self.apply_frame(outcome, &raw);
            }
            HumanEvent::Closed(reason) => self.revert_human(reason),
        }
    }

    fn apply_frame(&mut self, outcome: FrameOutcome, raw: &str) {
        match outcome {
            FrameOutcome::ReplaceHistory(messages) => {
                debug!(count = messages.len(), "History loaded");
                self.store.replace_all(Channel::Human, messages.clone());
                self.emit(ChatUpdate::TranscriptReplaced {
                    channel: Channel::Human,
                    messages,
                });
            }
            FrameOutcome::Append(message) => self.append(message),
            FrameOutcome::Dropped(DroppedFrame::Malformed(e)) => {
                warn!(error = %e, frame = %preview(raw, 80), "Dropping malformed frame");
            }
            FrameOutcome::Dropped(DroppedFrame::DuplicateHistory) => {
                warn!("Dropping repeated history batch");
            }
            FrameOutcome::Dropped(DroppedFrame::NotActive(state)) => {
                debug!(%state, "Dropping frame outside active session");
            }
        }
    }

    /// The socket went away on its own: back to the login view.
    fn revert_human(&mut self, reason: Option<TransportError>) {
        if let Some(mut slot) = self.human.take() {
            slot.machine.on_closed();
        }
        let reason = reason
            .map(|e| e.to_string())
            .unwrap_or_else(|| "the operator ended the session".to_string());
        info!(%reason, "Operator session ended");

        self.store.clear(Channel::Human);
        self.emit(ChatUpdate::ConnectionChanged(ConnectionState::Closed));
        self.emit(ChatUpdate::TranscriptCleared(Channel::Human));
        self.emit(ChatUpdate::ChannelReverted {
            channel: Channel::Human,
            reason,
        });
    }

    // ==================== Assistant channel ====================

    fn ask_assistant(&mut self, text: &str) {
        if !self.mediator.visibility().assistant_open() {
            self.reject("the assistant channel is not open");
            return;
        }
        let question = text.trim();
        if question.is_empty() {
            debug!("Ignoring blank question");
            return;
        }
        if self.in_flight.is_some() {
            self.reject("the assistant is still answering");
            return;
        }

        let request =
            AssistantRequest::from_transcript(self.store.messages(Channel::Assistant), question);
        self.append(Message::new(
            self.behavior.display_name.clone(),
            question,
            Utc::now(),
            Channel::Assistant,
        ));

        self.next_request_id += 1;
        let request_id = self.next_request_id;
        let cancel = self.cancellation_token.child_token();
        debug!(
            request_id,
            history = request.history.len(),
            question = %preview(question, 60),
            "Asking assistant"
        );
        spawn_assistant_reply(
            self.ports.assistant.clone(),
            request,
            request_id,
            self.events_tx.clone(),
            cancel.clone(),
        );
        self.in_flight = Some(InFlight { request_id, cancel });
        self.emit(ChatUpdate::AssistantStarted);
    }

    fn handle_assistant_event(&mut self, request_id: u64, event: AssistantEvent) {
        let live = self
            .in_flight
            .as_ref()
            .is_some_and(|f| f.request_id == request_id);
        if !live {
            debug!(request_id, "Ignoring event from superseded request");
            return;
        }

        match event {
            AssistantEvent::Increment(text) => self.emit(ChatUpdate::AssistantIncrement(text)),
            AssistantEvent::Finished(outcome) => {
                self.in_flight = None;
                match outcome {
                    ReplyOutcome::Completed(message) => self.append(message),
                    ReplyOutcome::Interrupted { partial, .. } => {
                        if let Some(message) = partial {
                            self.append(message);
                        }
                        self.append_unavailable_notice();
                    }
                    ReplyOutcome::Rejected(_) => self.append_unavailable_notice(),
                    ReplyOutcome::Cancelled => {}
                }
                self.emit(ChatUpdate::AssistantFinished);
            }
        }
    }

    fn append_unavailable_notice(&mut self) {
        let notice = Message::notice(
            Channel::Assistant,
            self.behavior.unavailable_notice.clone(),
            Utc::now(),
        );
        self.append(notice);
    }

    fn shutdown(&mut self) {
        let intents = self.mediator.close_all();
        self.apply_intents(intents);
        self.cancellation_token.cancel();
        self.emit(ChatUpdate::Exit);
    }
}
