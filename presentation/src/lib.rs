//! Presentation layer for duochat
//!
//! This crate contains the CLI definition, the line-based REPL that turns
//! input into controller commands, and the console presenter that renders
//! controller updates.

pub mod chat;
pub mod cli;
pub mod output;

// Re-export commonly used types
pub use chat::{ChatRepl, ReplInput, parse_input};
pub use cli::commands::Cli;
pub use output::{console::ConsoleFormatter, presenter::ChatPresenter};
