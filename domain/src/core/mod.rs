//! Core domain concepts shared across all subdomains.
//!
//! - [`identity::UserName`], [`identity::SessionId`], [`identity::Department`]
//!   - validated value objects for session negotiation
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod identity;
pub mod string;
