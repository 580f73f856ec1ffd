//! Server configuration from TOML (`[server]` section)

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_NEGOTIATE_PATH: &str = "/api/chat/request";
pub const DEFAULT_SESSION_PATH: &str = "/api/chat/session";
pub const DEFAULT_ASSISTANT_PATH: &str = "/api/ai-chat";

/// Raw server configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// HTTP(S) base URL; the socket URL is derived from it (http→ws, https→wss)
    pub base_url: String,
    /// Session negotiation endpoint
    pub negotiate_path: String,
    /// Socket path prefix; the session id is appended as the last segment
    pub session_path: String,
    /// Streamed assistant endpoint
    pub assistant_path: String,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            negotiate_path: DEFAULT_NEGOTIATE_PATH.to_string(),
            session_path: DEFAULT_SESSION_PATH.to_string(),
            assistant_path: DEFAULT_ASSISTANT_PATH.to_string(),
        }
    }
}
