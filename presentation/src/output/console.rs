//! Console formatting for chat messages and channel banners

use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use duochat_domain::{ASSISTANT_AUTHOR, Channel, Department, Message};

/// Formats chat entities for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One transcript line: `[HH:MM] author: text`, or the bare text for
    /// system notices.
    pub fn message(message: &Message) -> String {
        let time = message.timestamp().with_timezone(&Local).format("%H:%M");
        if message.is_notice() {
            return format!(
                "{} {}",
                format!("[{}]", time).dimmed(),
                message.text().yellow().italic()
            );
        }

        let author = if message.is_from_assistant() {
            message.author().magenta().bold()
        } else {
            message.author().cyan().bold()
        };
        format!(
            "{} {}: {}",
            format!("[{}]", time).dimmed(),
            author,
            Self::indent_continuation(message.text())
        )
    }

    /// Banner printed when a channel comes on screen
    pub fn channel_banner(channel: Channel) -> String {
        let (title, hint) = match channel {
            Channel::Human => (
                "Human chat",
                format!(
                    "Log in with {} ({})",
                    "/login <name> [department]".cyan(),
                    Department::ALL
                        .iter()
                        .map(|d| d.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            ),
            Channel::Assistant => (
                "Assistant",
                "Type a question; the reply streams in as it is written".to_string(),
            ),
        };
        format!(
            "\n{} {}\n{}\n",
            "━".repeat(50).dimmed(),
            title.bold().cyan(),
            hint.dimmed()
        )
    }

    /// Prefix written before a streamed assistant reply
    pub fn stream_prefix(time: DateTime<Utc>) -> String {
        format!(
            "{} {}: ",
            format!("[{}]", time.with_timezone(&Local).format("%H:%M")).dimmed(),
            ASSISTANT_AUTHOR.magenta().bold()
        )
    }

    pub fn error(message: &str) -> String {
        format!("{} {}", "Error:".red().bold(), message)
    }

    pub fn warning(message: &str) -> String {
        format!("{} {}", "!".yellow().bold(), message.yellow())
    }

    /// Indent every line after the first so multi-line text stays aligned
    /// under its author
    fn indent_continuation(text: &str) -> String {
        text.lines().collect::<Vec<_>>().join("\n        ")
    }
}
