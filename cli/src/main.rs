//! CLI entrypoint for codex-pilot
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use pilot_application::{AgentLauncher, event_channel};
use pilot_infrastructure::{
    CodexClient, CodexLauncher, ConfigLoader, FileConfig, FileLoggingConfig, LocalProjectInfo,
};
use pilot_presentation::{ChatRepl, Cli, ConsoleRenderer, track_turns};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const PUMP_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let file_config: FileConfig = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    file_config.validate()?;

    let _log_guard = init_logging(cli.verbose, &file_config.logging)?;
    info!("Starting codex-pilot");

    // === Dependency Injection ===
    let mut client_config = file_config.to_client_config();
    if let Some(program) = &cli.codex {
        client_config = client_config.with_executable(program.clone());
    }
    if cli.no_context {
        client_config = client_config.with_project_context(false);
    }

    let project_root: PathBuf = cli
        .project_dir
        .clone()
        .or_else(|| file_config.project.root.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let project = Arc::new(LocalProjectInfo::new(project_root));
    let launcher: Arc<dyn AgentLauncher> =
        Arc::new(CodexLauncher::new(client_config.executable.clone()));

    let (events, pump) = event_channel();
    let observers = pump.observers();
    let renderer = ConsoleRenderer::new();
    let message_renderer = renderer.clone();
    observers
        .on_message(move |message| message_renderer.print_message(message))
        .detach();
    observers
        .on_status(move |status| renderer.print_status(status))
        .detach();
    let turns = track_turns(&observers);

    let pump_cancel = CancellationToken::new();
    let mut pump_task = tokio::spawn(pump.run(pump_cancel.clone()));

    let client = Arc::new(CodexClient::new(launcher, project, client_config, events));

    let mut repl = ChatRepl::new(Arc::clone(&client), turns);
    let outcome = repl.run(cli.prompt.clone()).await;

    drop(repl);
    client.disconnect().await;
    // The client holds the last event sink; once it is gone the pump
    // delivers what is queued and returns.
    drop(client);
    if tokio::time::timeout(PUMP_FLUSH_TIMEOUT, &mut pump_task)
        .await
        .is_err()
    {
        warn!("Event pump did not finish, cancelling");
        pump_cancel.cancel();
        let _ = pump_task.await;
    }

    outcome.context("REPL failed")?;
    Ok(())
}

/// Install the global tracing subscriber.
///
/// `logging.level` from configuration wins over `RUST_LOG`, which wins over
/// the `-v` count. With `logging.file` set, logs go to that file and the
/// returned guard must be held until exit.
fn init_logging(verbose: u8, logging: &FileLoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = match (&logging.level, std::env::var("RUST_LOG")) {
        (Some(level), _) => EnvFilter::try_new(level)
            .with_context(|| format!("Invalid logging.level directive: {level}"))?,
        (None, Ok(directive)) if !directive.is_empty() => EnvFilter::try_new(&directive)
            .with_context(|| format!("Invalid RUST_LOG directive: {directive}"))?,
        _ => match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"), // -vvv or more
        },
    };

    match &logging.file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("logging.file has no file name: {}", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}
