//! Console output for the chat channels

pub mod console;
pub mod presenter;
