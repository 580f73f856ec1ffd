//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("User name must not be empty")]
    InvalidUserName,

    #[error("Unknown department: {0}")]
    InvalidDepartment(String),

    #[error("Session id must not be empty")]
    EmptySessionId,

    #[error("Invalid connection transition: {event} while {state}")]
    InvalidTransition { state: String, event: String },
}

impl DomainError {
    /// Check if this error was caused by user input rather than program state
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidUserName | DomainError::InvalidDepartment(_)
        )
    }
}
