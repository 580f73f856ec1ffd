//! Application-level configuration.
//!
//! - [`ChatBehavior`] - visitor-facing texts and names used by the controller

pub mod behavior;

pub use behavior::ChatBehavior;
