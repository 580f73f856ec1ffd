//! Infrastructure layer for duochat
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod http;
pub mod ws;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigIssue, ConfigLoader, FileChatConfig, FileConfig, FileLoggingConfig,
    FileOutputConfig, FileServerConfig, Severity,
};
pub use http::{Endpoints, HttpAssistantStream, HttpSessionNegotiator, http_to_ws_scheme};
pub use ws::WebSocketConnector;
