//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for duochat
#[derive(Parser, Debug)]
#[command(name = "duochat")]
#[command(author, version, about = "Terminal chat client for live operators and the AI assistant")]
#[command(long_about = r#"
duochat connects a visitor to one of two chat channels:

- Human: a live operator session for a department (sales, support, billing)
- Assistant: an automated assistant whose replies stream in as they are written

Only one channel is open at a time; opening one closes the other.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./duochat.toml      Project-level config (or ./.duochat.toml)
3. ~/.config/duochat/config.toml   Global config
4. DUOCHAT_* environment variables (e.g. DUOCHAT_SERVER__BASE_URL)

Example:
  duochat
  duochat --server https://chat.example.com --name Ana --department support
"#)]
pub struct Cli {
    /// Chat server base URL (overrides server.base_url)
    #[arg(short, long, value_name = "URL")]
    pub server: Option<String>,

    /// Log in to the human channel at startup with this name
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    /// Department for the startup login (defaults to chat.default_department)
    #[arg(short, long, value_name = "DEPARTMENT")]
    pub department: Option<String>,

    /// Open the assistant channel at startup
    #[arg(short, long, conflicts_with = "name")]
    pub assistant: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
