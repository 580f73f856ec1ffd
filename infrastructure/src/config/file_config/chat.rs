//! Chat configuration from TOML (`[chat]` section)

use duochat_application::ChatBehavior;
use duochat_application::config::behavior::DEFAULT_UNAVAILABLE_NOTICE;
use duochat_domain::Department;
use serde::{Deserialize, Serialize};

/// Raw chat configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// Name shown for the visitor's own questions to the assistant
    pub display_name: String,
    /// Department used by `/login <name>` when none is given
    pub default_department: Option<String>,
    /// Notice appended when the assistant cannot be reached
    pub unavailable_notice: String,
}

impl Default for FileChatConfig {
    fn default() -> Self {
        let behavior = ChatBehavior::default();
        Self {
            display_name: behavior.display_name,
            default_department: None,
            unavailable_notice: DEFAULT_UNAVAILABLE_NOTICE.to_string(),
        }
    }
}

impl FileChatConfig {
    /// Parse `default_department`; `None` if unset or unknown.
    pub fn parse_default_department(&self) -> Option<Department> {
        self.default_department.as_deref()?.parse().ok()
    }

    pub fn to_behavior(&self) -> ChatBehavior {
        ChatBehavior::default()
            .with_display_name(self.display_name.clone())
            .with_unavailable_notice(self.unavailable_notice.clone())
    }
}
