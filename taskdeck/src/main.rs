//! `taskdeck` — terminal client for a remote task service.
//!
//! Every invocation loads the current tasks and labels, performs one
//! action, and prints the resulting view. Configuration via CLI flags,
//! environment variables, or config file (`~/.config/taskdeck/config.toml`).
//!
//! ```bash
//! # Show everything
//! cargo run --bin taskdeck
//!
//! # Add a task with a label, then mark it done
//! cargo run --bin taskdeck -- add "buy milk" --label errands
//! cargo run --bin taskdeck -- toggle 12
//!
//! # Point at another service
//! TASKDECK_URL=http://10.0.0.5:3000 cargo run --bin taskdeck -- list -l urgent
//! ```

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use taskdeck::cli::{self, UsageError};
use taskdeck::config::{CliArgs, ClientConfig, ConfigError};
use taskdeck::controller::{Controller, Outcome};
use taskdeck::remote::{EndpointError, RemoteClient, RequestError};
use taskdeck::ui;

/// Everything that can stop a run.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Usage(#[from] UsageError),
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CliArgs::parse();

    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = init_logging(&config.log_level, config.log_file.as_deref());
    tracing::debug!(base_url = %config.base_url, sync_mode = %config.sync_mode, "taskdeck starting");

    match run(&cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "taskdeck failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging.
///
/// Logs go to `file_path` when given, otherwise to stderr, so stdout only
/// ever carries the rendered view. Returns a [`WorkerGuard`] that must be
/// held until shutdown to flush buffered entries.
fn init_logging(level: &str, file_path: Option<&Path>) -> WorkerGuard {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let file_appender = file_path.and_then(|path| {
        let dir = path.parent().filter(|d| !d.as_os_str().is_empty());
        let name = path.file_name()?;
        Some(tracing_appender::rolling::never(
            dir.unwrap_or_else(|| Path::new(".")),
            name,
        ))
    });

    let (non_blocking, guard) = match file_appender {
        Some(appender) => tracing_appender::non_blocking(appender),
        None => tracing_appender::non_blocking(io::stderr()),
    };

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    guard
}

/// Load, dispatch the requested action, render.
async fn run(cli: &CliArgs, config: &ClientConfig) -> Result<(), CliError> {
    let endpoint = config.to_endpoint()?;
    let controller = Controller::new(RemoteClient::new(endpoint)).with_sync_mode(config.sync_mode);

    controller.load().await?;

    let command = cli.command.clone().unwrap_or_default();
    let intent = cli::intent_for(&command, &controller.view())?;

    let outcome = controller.dispatch(intent).await?;

    let mut stdout = io::stdout().lock();
    if let Outcome::Ignored(reason) = outcome {
        writeln!(stdout, "nothing to do: {reason}")?;
    }
    ui::render(&controller.view(), &mut stdout)?;
    stdout.flush()?;
    Ok(())
}
