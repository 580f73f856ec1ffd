//! Chat behaviour parameters.
//!
//! [`ChatBehavior`] groups the static values the
//! [`ChatController`](crate::use_cases::chat_controller::ChatController)
//! needs but does not own: how the visitor is named in the assistant
//! transcript and which notice replaces an unreachable assistant.

use serde::{Deserialize, Serialize};

/// Default notice shown when the assistant cannot be reached
pub const DEFAULT_UNAVAILABLE_NOTICE: &str = "assistant is unavailable";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatBehavior {
    /// Author of the visitor's own questions in the assistant transcript
    pub display_name: String,
    /// Notice appended when the assistant request fails or is interrupted
    pub unavailable_notice: String,
}

impl Default for ChatBehavior {
    fn default() -> Self {
        Self {
            display_name: "You".to_string(),
            unavailable_notice: DEFAULT_UNAVAILABLE_NOTICE.to_string(),
        }
    }
}

impl ChatBehavior {
    // ==================== Builder Methods ====================

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_unavailable_notice(mut self, notice: impl Into<String>) -> Self {
        self.unavailable_notice = notice.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let behavior = ChatBehavior::default();
        assert_eq!(behavior.display_name, "You");
        assert_eq!(behavior.unavailable_notice, "assistant is unavailable");
    }

    #[test]
    fn test_builders() {
        let behavior = ChatBehavior::default()
            .with_display_name("Ana")
            .with_unavailable_notice("try again later");
        assert_eq!(behavior.display_name, "Ana");
        assert_eq!(behavior.unavailable_notice, "try again later");
    }
}
