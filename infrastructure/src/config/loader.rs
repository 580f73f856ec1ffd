//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Project-level config file names, checked in order
const PROJECT_FILES: [&str; 2] = ["duochat.toml", ".duochat.toml"];

/// Environment variable prefix; nested keys are separated by `__`
pub const ENV_PREFIX: &str = "DUOCHAT_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Explicit config path (if provided)
    /// 2. Project root: `./duochat.toml` or `./.duochat.toml`
    /// 3. Global config: `$XDG_CONFIG_HOME/duochat/config.toml`
    /// 4. Environment: `DUOCHAT_SERVER__BASE_URL` and friends
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(&global_path));
            }
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            figment = figment.merge(Toml::file(path));
        }

        figment.extract().map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("duochat").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(explicit: Option<&Path>) {
        println!("Configuration sources (in priority order):");

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "     " };
            println!("  [{mark}] Explicit: {}", path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./duochat.toml or ./.duochat.toml");
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            println!("  [{mark}] Global:  {}", path.display());
        }

        println!("  [     ] Env:     {ENV_PREFIX}<SECTION>__<KEY>");
        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::io::Write;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().ends_with("duochat/config.toml"));
    }

    #[test]
    fn test_project_file_is_merged() {
        Jail::expect_with(|jail| {
            jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
            jail.create_file(
                "duochat.toml",
                r#"
[server]
base_url = "https://project.example.com"
"#,
            )?;

            let config = ConfigLoader::load(None).expect("config loads");
            assert_eq!(config.server.base_url, "https://project.example.com");
            assert_eq!(config.server.negotiate_path, "/api/chat/request");
            assert_eq!(config.chat.display_name, "You");
            Ok(())
        });
    }

    #[test]
    fn test_priority_explicit_over_project_over_env() {
        Jail::expect_with(|jail| {
            jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
            jail.set_env("DUOCHAT_CHAT__DISPLAY_NAME", "from-env");
            jail.set_env("DUOCHAT_OUTPUT__COLOR", "false");
            jail.create_file(
                ".duochat.toml",
                r#"
[chat]
display_name = "from-project"
unavailable_notice = "project notice"
"#,
            )?;

            let mut explicit = tempfile::NamedTempFile::new().expect("temp file");
            writeln!(explicit, "[chat]\ndisplay_name = \"from-explicit\"").expect("write");

            let config = ConfigLoader::load(Some(explicit.path())).expect("config loads");
            assert_eq!(config.chat.display_name, "from-explicit");
            assert_eq!(config.chat.unavailable_notice, "project notice");
            assert!(!config.output.color);
            Ok(())
        });
    }

    #[test]
    fn test_global_file_is_merged() {
        Jail::expect_with(|jail| {
            let xdg = jail.directory().join("xdg");
            std::fs::create_dir_all(xdg.join("duochat")).expect("mkdir");
            std::fs::write(
                xdg.join("duochat").join("config.toml"),
                "[chat]\ndefault_department = \"billing\"\n",
            )
            .expect("write");
            jail.set_env("XDG_CONFIG_HOME", xdg.display());

            let config = ConfigLoader::load(None).expect("config loads");
            assert_eq!(config.chat.default_department.as_deref(), Some("billing"));
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = ConfigLoader::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut explicit = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(explicit, "[output]\ncolor = \"maybe\"").expect("write");
        let err = ConfigLoader::load(Some(explicit.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
