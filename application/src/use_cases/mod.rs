//! Use cases
//!
//! Per-channel tasks and the controller that orchestrates them.

pub mod assistant_reply;
pub mod channel_mediator;
pub mod chat_controller;
pub mod human_session;

#[cfg(test)]
pub(crate) mod test_support;
