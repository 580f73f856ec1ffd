//! Operator session socket lifecycle.
//!
//! - [`state::ConnectionState`] - lifecycle states
//! - [`state::ConnectionStateMachine`] - transitions and inbound frame handling

pub mod state;
