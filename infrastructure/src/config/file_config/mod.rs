//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; conversion to application types happens
//! through the `to_*` / `parse_*` helpers on each section.

mod chat;
mod logging;
mod output;
mod server;

pub use chat::FileChatConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use server::FileServerConfig;

use duochat_domain::{ASSISTANT_AUTHOR, Department, SYSTEM_AUTHOR};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the client cannot reach the server with this configuration.
    Error,
    /// Non-fatal: a value is ignored or falls back to its default.
    Warning,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    /// Dotted path of the offending field, e.g. `server.base_url`
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    fn error(field: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field: field.to_string(),
            message: message.into(),
        }
    }

    fn warning(field: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Chat server endpoints
    pub server: FileServerConfig,
    /// Visitor-facing chat settings
    pub chat: FileChatConfig,
    /// Log destination
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Render the effective configuration as TOML (for `--show-config`)
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Base URL
        let base_url = self.server.base_url.trim();
        if base_url.is_empty() {
            issues.push(ConfigIssue::error("server.base_url", "base URL is empty"));
        } else {
            match reqwest::Url::parse(base_url) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                Ok(url) => issues.push(ConfigIssue::error(
                    "server.base_url",
                    format!("unsupported scheme '{}', expected http or https", url.scheme()),
                )),
                Err(e) => issues.push(ConfigIssue::error(
                    "server.base_url",
                    format!("'{base_url}' is not a valid URL: {e}"),
                )),
            }
        }

        // 2. Endpoint paths
        for (field, value) in [
            ("server.negotiate_path", &self.server.negotiate_path),
            ("server.session_path", &self.server.session_path),
            ("server.assistant_path", &self.server.assistant_path),
        ] {
            if !value.starts_with('/') {
                issues.push(ConfigIssue::warning(
                    field,
                    format!("'{value}' does not start with '/'; one will be added"),
                ));
            }
        }

        // 3. Chat section
        if let Some(department) = &self.chat.default_department {
            if department.parse::<Department>().is_err() {
                let valid: Vec<&str> = Department::ALL.iter().map(|d| d.as_str()).collect();
                issues.push(ConfigIssue::warning(
                    "chat.default_department",
                    format!(
                        "unknown department '{department}' (valid: {}), ignoring",
                        valid.join(", ")
                    ),
                ));
            }
        }
        if self.chat.display_name.trim().is_empty() {
            issues.push(ConfigIssue::warning(
                "chat.display_name",
                "display name is empty",
            ));
        }
        let display_name = self.chat.display_name.trim();
        if [ASSISTANT_AUTHOR, SYSTEM_AUTHOR]
            .iter()
            .any(|reserved| display_name.eq_ignore_ascii_case(reserved))
        {
            issues.push(ConfigIssue::error(
                "chat.display_name",
                format!("'{display_name}' is reserved for assistant replies and notices"),
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[server]
base_url = "https://chat.example.com"
negotiate_path = "/v2/request"
session_path = "/v2/session"
assistant_path = "/v2/assistant"

[chat]
display_name = "Ana"
default_department = "support"
unavailable_notice = "try later"

[logging]
file = "/tmp/duochat.log"

[output]
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.base_url, "https://chat.example.com");
        assert_eq!(config.server.session_path, "/v2/session");
        assert_eq!(config.chat.display_name, "Ana");
        assert_eq!(
            config.chat.parse_default_department(),
            Some(Department::Support)
        );
        assert_eq!(
            config.logging.file.as_deref(),
            Some(std::path::Path::new("/tmp/duochat.log"))
        );
        assert!(!config.output.color);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.server.base_url, "http://localhost:8080");
        assert_eq!(config.chat.display_name, "You");
        assert_eq!(config.chat.unavailable_notice, "assistant is unavailable");
        assert!(config.logging.file.is_none());
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_empty_base_url() {
        let mut config = FileConfig::default();
        config.server.base_url = "  ".to_string();
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].field, "server.base_url");
    }

    #[test]
    fn test_validate_bad_scheme_and_garbage() {
        let mut config = FileConfig::default();
        config.server.base_url = "ftp://chat.example.com".to_string();
        assert!(config.validate()[0].message.contains("unsupported scheme"));

        config.server.base_url = "not a url".to_string();
        assert!(config.validate()[0].message.contains("not a valid URL"));
    }

    #[test]
    fn test_validate_unknown_department_is_warning() {
        let mut config = FileConfig::default();
        config.chat.default_department = Some("legal".to_string());
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(issues[0].message.contains("sales, support, billing"));
    }

    #[test]
    fn test_validate_reserved_display_name_is_error() {
        for name in ["assistant", "System", " assistant "] {
            let mut config = FileConfig::default();
            config.chat.display_name = name.to_string();
            let issues = config.validate();
            assert_eq!(issues.len(), 1, "{name}");
            assert_eq!(issues[0].severity, Severity::Error);
            assert_eq!(issues[0].field, "chat.display_name");
            assert!(issues[0].message.contains("reserved"));
        }
    }

    #[test]
    fn test_validate_relative_path_is_warning() {
        let mut config = FileConfig::default();
        config.server.assistant_path = "api/ai-chat".to_string();
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "server.assistant_path");
        assert_eq!(
            issues[0].to_string(),
            "server.assistant_path: 'api/ai-chat' does not start with '/'; one will be added"
        );
    }
}
