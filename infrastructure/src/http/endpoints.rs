//! Chat server endpoint URLs.

use crate::config::FileServerConfig;
use duochat_domain::SessionId;

/// Resolved endpoint URLs for one chat server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
    negotiate_path: String,
    session_path: String,
    assistant_path: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Self::from_config(&FileServerConfig {
            base_url: base_url.to_string(),
            ..FileServerConfig::default()
        })
    }

    pub fn from_config(config: &FileServerConfig) -> Self {
        Self {
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            negotiate_path: normalize_path(&config.negotiate_path),
            session_path: normalize_path(&config.session_path),
            assistant_path: normalize_path(&config.assistant_path),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST` target for session negotiation
    pub fn negotiate_url(&self) -> String {
        format!("{}{}", self.base_url, self.negotiate_path)
    }

    /// `POST` target for streamed assistant replies
    pub fn assistant_url(&self) -> String {
        format!("{}{}", self.base_url, self.assistant_path)
    }

    /// Socket URL for one operator session
    pub fn session_url(&self, session_id: &SessionId) -> String {
        format!(
            "{}{}/{}",
            http_to_ws_scheme(&self.base_url),
            self.session_path.trim_end_matches('/'),
            session_id
        )
    }
}

fn normalize_path(path: &str) -> String {
    let path = path.trim();
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Convert an HTTP(S) URL to WS(S) scheme.
///
/// Passes `ws://` and `wss://` through unchanged.
#[must_use]
pub fn http_to_ws_scheme(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_to_ws_scheme() {
        assert_eq!(http_to_ws_scheme("https://example.com"), "wss://example.com");
        assert_eq!(
            http_to_ws_scheme("http://localhost:8080"),
            "ws://localhost:8080"
        );
        assert_eq!(http_to_ws_scheme("wss://example.com"), "wss://example.com");
        assert_eq!(http_to_ws_scheme("ws://example.com"), "ws://example.com");
    }

    #[test]
    fn test_only_the_scheme_is_rewritten() {
        assert_eq!(
            http_to_ws_scheme("https://proxy.example.com/http://inner"),
            "wss://proxy.example.com/http://inner"
        );
    }

    #[test]
    fn test_default_urls() {
        let endpoints = Endpoints::new("http://localhost:8080/");
        let session = SessionId::new("abc123").unwrap();
        assert_eq!(
            endpoints.negotiate_url(),
            "http://localhost:8080/api/chat/request"
        );
        assert_eq!(endpoints.assistant_url(), "http://localhost:8080/api/ai-chat");
        assert_eq!(
            endpoints.session_url(&session),
            "ws://localhost:8080/api/chat/session/abc123"
        );
    }

    #[test]
    fn test_custom_paths_are_normalized() {
        let endpoints = Endpoints::from_config(&FileServerConfig {
            base_url: "https://chat.example.com".to_string(),
            negotiate_path: "v2/request".to_string(),
            session_path: "/v2/session/".to_string(),
            assistant_path: "/v2/assistant".to_string(),
        });
        let session = SessionId::new("s-1").unwrap();
        assert_eq!(
            endpoints.negotiate_url(),
            "https://chat.example.com/v2/request"
        );
        assert_eq!(
            endpoints.session_url(&session),
            "wss://chat.example.com/v2/session/s-1"
        );
    }
}
