//! REPL (Read-Eval-Print Loop) for the chat client
//!
//! Reads lines from an async reader (stdin in the binary) and forwards them
//! to the ChatController as [`ChatCommand`]s. Output comes back separately
//! through the ChatPresenter; the REPL only prints help and input errors.

use super::input::{ReplInput, parse_input};
use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use duochat_application::ChatCommand;
use duochat_domain::{Channel, Department};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Interactive chat REPL
pub struct ChatRepl {
    commands: mpsc::UnboundedSender<ChatCommand>,
    default_department: Option<Department>,
    /// Channel that plain text goes to
    focus: Option<Channel>,
    cancellation_token: CancellationToken,
}

impl ChatRepl {
    pub fn new(commands: mpsc::UnboundedSender<ChatCommand>) -> Self {
        Self {
            commands,
            default_department: None,
            focus: None,
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Department used by `/login <name>`
    pub fn with_default_department(mut self, department: Option<Department>) -> Self {
        self.default_department = department;
        self
    }

    /// Stop reading input when this token fires
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    pub fn focus(&self) -> Option<Channel> {
        self.focus
    }

    /// Read lines until `/quit`, end of input, or cancellation, then ask the
    /// controller to shut down.
    pub async fn run<R>(mut self, input: R)
    where
        R: AsyncBufRead + Unpin,
    {
        Self::print_welcome();
        let mut lines = input.lines();

        loop {
            let line = tokio::select! {
                biased;
                _ = self.cancellation_token.cancelled() => {
                    debug!("REPL cancelled");
                    break;
                }
                line = lines.next_line() => line,
            };

            match line {
                Ok(Some(line)) => {
                    let parsed = parse_input(&line, self.default_department);
                    if !self.handle(parsed) {
                        break;
                    }
                }
                Ok(None) => {
                    debug!("End of input");
                    break;
                }
                Err(e) => {
                    eprintln!("{}", ConsoleFormatter::error(&format!("reading input: {}", e)));
                    break;
                }
            }
        }

        let _ = self.commands.send(ChatCommand::Shutdown);
    }

    /// Act on one parsed line. Returns `false` once the REPL should stop.
    pub fn handle(&mut self, input: ReplInput) -> bool {
        match input {
            ReplInput::Empty => {}
            ReplInput::Quit => return false,
            ReplInput::Help => Self::print_help(),
            ReplInput::Invalid(message) => {
                println!("{} {}", "?".yellow(), message);
                println!("Type {} for available commands", "/help".cyan());
            }
            ReplInput::Text(text) => match self.focus {
                Some(Channel::Human) => return self.send(ChatCommand::SendHuman(text)),
                Some(Channel::Assistant) => return self.send(ChatCommand::AskAssistant(text)),
                None => println!(
                    "No chat is open. Use {} or {} first.",
                    "/human".cyan(),
                    "/assistant".cyan()
                ),
            },
            ReplInput::Command(command) => {
                self.track_focus(&command);
                return self.send(command);
            }
        }
        true
    }

    fn track_focus(&mut self, command: &ChatCommand) {
        match command {
            ChatCommand::OpenHuman | ChatCommand::ConnectHuman { .. } => {
                self.focus = Some(Channel::Human)
            }
            ChatCommand::OpenAssistant => self.focus = Some(Channel::Assistant),
            ChatCommand::CloseAll => self.focus = None,
            _ => {}
        }
    }

    fn send(&self, command: ChatCommand) -> bool {
        if self.commands.send(command).is_err() {
            debug!("Controller gone; stopping REPL");
            return false;
        }
        true
    }

    fn print_welcome() {
        println!();
        println!("{}", "╭─────────────────────────────────────────────╮".cyan());
        println!("{}", "│                  duochat                    │".cyan());
        println!("{}", "╰─────────────────────────────────────────────╯".cyan());
        println!();
        println!(
            "Open a chat with {} or {}. Type {} for all commands.",
            "/human".cyan(),
            "/assistant".cyan(),
            "/help".cyan()
        );
        println!();
    }

    fn print_help() {
        println!();
        println!("Commands:");
        println!("  /human                       - Open the human chat");
        println!("  /login <name> [department]  - Start an operator session");
        println!("  /assistant, /ai              - Open the assistant chat");
        println!("  /close                       - Close the open chat");
        println!("  /lang <tag>                  - Report a language change");
        println!("  /help, /h, /?                - Show this help");
        println!("  /quit, /exit, /q             - Exit");
        println!();
        println!("Anything else is sent to the open chat.");
        println!();
    }
}
