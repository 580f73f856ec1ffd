//! Configuration file loading for duochat
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./duochat.toml` or `./.duochat.toml`
//! 3. Global config: `$XDG_CONFIG_HOME/duochat/config.toml`
//! 4. `DUOCHAT_*` environment variables
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, FileChatConfig, FileConfig, FileLoggingConfig, FileOutputConfig,
    FileServerConfig, Severity,
};
pub use loader::{ConfigError, ConfigLoader, ENV_PREFIX};
