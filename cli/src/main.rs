//! CLI entrypoint for duochat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use duochat_application::{ChatCommand, ChatController, ChatPorts};
use duochat_domain::Department;
use duochat_infrastructure::{
    ConfigLoader, Endpoints, FileConfig, HttpAssistantStream, HttpSessionNegotiator, Severity,
    WebSocketConnector,
};
use duochat_presentation::{ChatPresenter, ChatRepl, Cli, ReplInput};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        let config = load_config(&cli)?;
        println!();
        println!("Effective configuration:");
        println!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let mut config = load_config(&cli)?;
    if let Some(server) = &cli.server {
        config.server.base_url = server.clone();
    }
    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }
    check_config(&config)?;

    let log_guard = init_logging(cli.verbose, config.logging.file.as_deref())?;
    info!(server = %config.server.base_url, "Starting duochat");

    // === Dependency Injection ===
    let endpoints = Endpoints::from_config(&config.server);
    let client = reqwest::Client::builder()
        .build()
        .context("failed to build HTTP client")?;
    let ports = ChatPorts {
        negotiator: Arc::new(HttpSessionNegotiator::new(client.clone(), endpoints.clone())),
        connector: Arc::new(WebSocketConnector::new(endpoints.clone())),
        assistant: Arc::new(HttpAssistantStream::new(client, endpoints)),
    };

    let cancellation_token = CancellationToken::new();
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let controller = ChatController::new(ports, config.chat.to_behavior(), update_tx)
        .with_cancellation(cancellation_token.clone());
    let controller_task = tokio::spawn(controller.run(command_rx));
    let presenter_task = tokio::spawn(ChatPresenter::new().run(update_rx));

    {
        let token = cancellation_token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupted");
                token.cancel();
            }
        });
    }

    let default_department = config.chat.parse_default_department();
    let mut repl = ChatRepl::new(command_tx)
        .with_default_department(default_department)
        .with_cancellation(cancellation_token.clone());

    if cli.assistant {
        repl.handle(ReplInput::Command(ChatCommand::OpenAssistant));
    } else if let Some(name) = cli.name {
        let department: Department = match (cli.department, default_department) {
            (Some(department), _) => department
                .parse()
                .with_context(|| format!("invalid --department '{}'", department))?,
            (None, Some(department)) => department,
            (None, None) => bail!("--name needs --department (no chat.default_department set)"),
        };
        repl.handle(ReplInput::Command(ChatCommand::ConnectHuman {
            user_name: name,
            department: department.as_str().to_string(),
        }));
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    repl.run(stdin).await;

    controller_task.await.context("chat controller panicked")?;
    presenter_task.await.context("presenter panicked")?;

    if cancellation_token.is_cancelled() {
        // A stdin read may still be parked on the blocking pool and would
        // hold the runtime open until the next keypress.
        drop(log_guard);
        std::process::exit(130);
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    if cli.no_config {
        return Ok(ConfigLoader::load_defaults());
    }
    ConfigLoader::load(cli.config.as_deref()).context("failed to load configuration")
}

/// Print configuration issues; fail if any of them is an error.
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Error => eprintln!("config error: {}", issue),
            Severity::Warning => eprintln!("config warning: {}", issue),
        }
    }
    if issues.iter().any(|i| i.severity == Severity::Error) {
        bail!("invalid configuration");
    }
    Ok(())
}

/// Initialize logging based on verbosity level. `RUST_LOG` wins when set.
///
/// Logs go to stderr, or to `file` when configured so they stay out of the
/// chat transcript.
fn init_logging(verbose: u8, file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    let Some(path) = file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("log file path has no file name: {}", path.display()))?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("failed to create log directory {}", directory.display()))?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    info!(path = %path.display(), "Logging to file");
    Ok(Some(guard))
}
