//! Session negotiation port
//!
//! Defines how the application turns a visitor name and department into an
//! operator session identifier.

use async_trait::async_trait;
use duochat_domain::{Department, DomainError, SessionId, UserName};
use thiserror::Error;

/// Errors that can occur while negotiating an operator session.
///
/// Fatal to the open attempt, never to the application.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NegotiationError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] DomainError),

    #[error("Session request rejected (HTTP {status}): {diagnostic}")]
    Rejected { status: u16, diagnostic: String },

    #[error("Session response is missing session id")]
    MissingSessionId,

    #[error("Transport error: {0}")]
    Transport(String),
}

impl NegotiationError {
    /// Generic diagnostic used when the server body cannot be read
    pub const GENERIC_DIAGNOSTIC: &'static str = "the chat service could not start a session";

    /// Build a rejection, substituting a generic diagnostic for an empty body
    pub fn rejected(status: u16, body: Option<String>) -> Self {
        let diagnostic = body
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| Self::GENERIC_DIAGNOSTIC.to_string());
        Self::Rejected { status, diagnostic }
    }
}

/// Negotiates operator sessions.
///
/// Exactly one request per call; implementations never retry.
#[async_trait]
pub trait SessionNegotiator: Send + Sync {
    async fn negotiate(
        &self,
        user: &UserName,
        department: Department,
    ) -> Result<SessionId, NegotiationError>;
}
