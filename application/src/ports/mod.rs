//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod assistant_stream;
pub mod chat_socket;
pub mod chat_update;
pub mod session_negotiator;
