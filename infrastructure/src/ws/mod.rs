//! WebSocket adapter for operator sessions

pub mod connector;

pub use connector::WebSocketConnector;
