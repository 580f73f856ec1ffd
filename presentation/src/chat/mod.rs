//! Interactive chat module
//!
//! Reads visitor input line by line and turns it into controller commands.

mod input;
mod repl;

pub use input::{ReplInput, parse_input};
pub use repl::ChatRepl;
