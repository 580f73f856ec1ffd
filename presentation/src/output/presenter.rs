//! Chat Presenter - Renders ChatUpdates to the terminal
//!
//! All console output for the chat channels is concentrated here, separating
//! display from the chat state owned by the ChatController in the
//! application layer. The presenter keeps only display state: the spinner
//! shown while something is pending and whether an assistant reply is
//! currently being streamed onto the line.

use crate::output::console::ConsoleFormatter;
use chrono::Utc;
use colored::Colorize;
use duochat_application::ChatUpdate;
use duochat_domain::{Channel, ConnectionState, Message};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// Renders ChatUpdates to a writer (stdout by default)
pub struct ChatPresenter<W: Write = io::Stdout> {
    out: W,
    spinners: bool,
    spinner: Option<ProgressBar>,
    /// An assistant reply is being written onto the current line
    streaming: bool,
}

impl ChatPresenter<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout(), true)
    }
}

impl Default for ChatPresenter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ChatPresenter<W> {
    /// Render into `out`. Spinners draw to the terminal directly, so they are
    /// only useful when `out` is the terminal too.
    pub fn with_writer(out: W, spinners: bool) -> Self {
        Self {
            out,
            spinners,
            spinner: None,
            streaming: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Render updates until the controller exits or the channel closes.
    pub async fn run(mut self, mut updates: mpsc::UnboundedReceiver<ChatUpdate>) {
        while let Some(update) = updates.recv().await {
            if let Err(e) = self.render(&update) {
                debug!(error = %e, "Console write failed");
            }
            if matches!(update, ChatUpdate::Exit) {
                break;
            }
        }
        self.stop_spinner();
    }

    /// Render a single ChatUpdate
    pub fn render(&mut self, update: &ChatUpdate) -> io::Result<()> {
        match update {
            ChatUpdate::VisibilityChanged(visibility) => {
                self.stop_spinner();
                self.end_stream()?;
                match visibility.open_channel() {
                    Some(channel) => {
                        writeln!(self.out, "{}", ConsoleFormatter::channel_banner(channel))?
                    }
                    None => writeln!(self.out, "{}", "Chat closed.".dimmed())?,
                }
            }
            ChatUpdate::ChannelReverted { channel, reason } => {
                self.stop_spinner();
                let hint = match channel {
                    Channel::Human => "Use /login to start a new session.",
                    Channel::Assistant => "Ask again to start a new reply.",
                };
                writeln!(
                    self.out,
                    "{}",
                    ConsoleFormatter::warning(&format!("Session ended: {}. {}", reason, hint))
                )?;
            }
            ChatUpdate::HumanNegotiating { user, department } => {
                self.start_spinner(format!("Requesting a {} operator for {}...", department, user));
            }
            ChatUpdate::NegotiationFailed { error } => {
                self.stop_spinner();
                writeln!(
                    self.out,
                    "{}",
                    ConsoleFormatter::error(&format!("Could not start a session: {}", error))
                )?;
            }
            ChatUpdate::ConnectionChanged(state) => self.render_connection(*state)?,
            ChatUpdate::TranscriptReplaced { channel, messages } => {
                self.stop_spinner();
                if !messages.is_empty() {
                    writeln!(
                        self.out,
                        "{}",
                        format!("── {} earlier message(s) in {} ──", messages.len(), channel).dimmed()
                    )?;
                }
                for message in messages {
                    writeln!(self.out, "{}", ConsoleFormatter::message(message))?;
                }
            }
            ChatUpdate::MessageAppended(message) => self.render_message(message)?,
            ChatUpdate::TranscriptCleared(channel) => {
                debug!(%channel, "Transcript cleared");
            }
            ChatUpdate::AssistantStarted => {
                self.start_spinner("Assistant is thinking...".to_string());
            }
            ChatUpdate::AssistantIncrement(text) => {
                if !self.streaming {
                    self.stop_spinner();
                    write!(self.out, "{}", ConsoleFormatter::stream_prefix(Utc::now()))?;
                    self.streaming = true;
                }
                write!(self.out, "{}", text)?;
                self.out.flush()?;
            }
            ChatUpdate::AssistantFinished => {
                self.stop_spinner();
                self.end_stream()?;
            }
            ChatUpdate::CommandRejected { reason } => {
                self.end_stream()?;
                writeln!(self.out, "{}", ConsoleFormatter::error(reason))?;
            }
            ChatUpdate::Exit => {
                self.stop_spinner();
                self.end_stream()?;
                writeln!(self.out, "Bye!")?;
            }
        }
        self.out.flush()
    }

    fn render_connection(&mut self, state: ConnectionState) -> io::Result<()> {
        match state {
            ConnectionState::Connecting => {
                if let Some(spinner) = &self.spinner {
                    spinner.set_message("Opening the session...");
                }
            }
            ConnectionState::Active => {
                self.stop_spinner();
                writeln!(
                    self.out,
                    "{}",
                    "Connected. An operator will be with you shortly.".green()
                )?;
            }
            ConnectionState::Closed | ConnectionState::Disconnected => self.stop_spinner(),
        }
        Ok(())
    }

    fn render_message(&mut self, message: &Message) -> io::Result<()> {
        // A streamed reply is already on screen; only terminate its line.
        if self.streaming && message.is_from_assistant() {
            return self.end_stream();
        }
        self.stop_spinner();
        self.end_stream()?;
        writeln!(self.out, "{}", ConsoleFormatter::message(message))
    }

    fn end_stream(&mut self) -> io::Result<()> {
        if self.streaming {
            self.streaming = false;
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn start_spinner(&mut self, message: String) {
        self.stop_spinner();
        if !self.spinners {
            return;
        }
        let style = ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let spinner = ProgressBar::new_spinner().with_style(style);
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duochat_domain::{ChannelVisibility, Department, UserName};

    fn render_all(updates: &[ChatUpdate]) -> String {
        let mut presenter = ChatPresenter::with_writer(Vec::new(), false);
        for update in updates {
            presenter.render(update).unwrap();
        }
        String::from_utf8(presenter.into_inner()).unwrap()
    }

    fn opened(channel: Channel) -> ChatUpdate {
        let mut visibility = ChannelVisibility::default();
        visibility.show(channel);
        ChatUpdate::VisibilityChanged(visibility)
    }

    #[test]
    fn test_streamed_reply_is_not_printed_twice() {
        let out = render_all(&[
            opened(Channel::Assistant),
            ChatUpdate::AssistantStarted,
            ChatUpdate::AssistantIncrement("Hel".to_string()),
            ChatUpdate::AssistantIncrement("lo".to_string()),
            ChatUpdate::MessageAppended(Message::assistant("Hello", Utc::now())),
            ChatUpdate::AssistantFinished,
        ]);
        assert!(out.contains("Hello\n"));
        assert_eq!(out.matches("Hel").count(), 1);
    }

    #[test]
    fn test_notice_after_partial_reply_starts_new_line() {
        let out = render_all(&[
            ChatUpdate::AssistantIncrement("par".to_string()),
            ChatUpdate::MessageAppended(Message::assistant("par", Utc::now())),
            ChatUpdate::MessageAppended(Message::notice(
                Channel::Assistant,
                "Assistant unavailable",
                Utc::now(),
            )),
            ChatUpdate::AssistantFinished,
        ]);
        let par = out.find("par\n").unwrap();
        let notice = out.find("Assistant unavailable").unwrap();
        assert!(par < notice);
    }

    #[test]
    fn test_history_is_printed_in_order() {
        let out = render_all(&[ChatUpdate::TranscriptReplaced {
            channel: Channel::Human,
            messages: vec![
                Message::new("Op", "first", Utc::now(), Channel::Human),
                Message::new("Ana", "second", Utc::now(), Channel::Human),
            ],
        }]);
        assert!(out.contains("2 earlier message(s)"));
        assert!(out.find("first").unwrap() < out.find("second").unwrap());
    }

    #[test]
    fn test_session_lifecycle_messages() {
        let out = render_all(&[
            opened(Channel::Human),
            ChatUpdate::HumanNegotiating {
                user: UserName::new("Ana").unwrap(),
                department: Department::Support,
            },
            ChatUpdate::ConnectionChanged(ConnectionState::Connecting),
            ChatUpdate::ConnectionChanged(ConnectionState::Active),
            ChatUpdate::ConnectionChanged(ConnectionState::Closed),
            ChatUpdate::ChannelReverted {
                channel: Channel::Human,
                reason: "connection reset".to_string(),
            },
        ]);
        assert!(out.contains("Human chat"));
        assert!(out.contains("Connected."));
        assert!(out.contains("Session ended: connection reset"));
    }

    #[test]
    fn test_rejection_and_exit() {
        let out = render_all(&[
            ChatUpdate::CommandRejected {
                reason: "not connected to an operator".to_string(),
            },
            ChatUpdate::VisibilityChanged(ChannelVisibility::default()),
            ChatUpdate::Exit,
        ]);
        assert!(out.contains("not connected to an operator"));
        assert!(out.contains("Chat closed."));
        assert!(out.ends_with("Bye!\n"));
    }
}
