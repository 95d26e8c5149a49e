//! ReadAll - select, mark read and deselect every message in a webmail tab.
//!
//! Main entry point for the ReadAll CLI.

mod adapters;
mod cli;
mod cmd_browser;
mod register;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use readall_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};

use crate::cli::{Cli, Commands};

/// Initialize tracing with console and file output.
///
/// Log files are written to the configured directory with daily rotation.
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let log_dir = logging.directory_path();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("readall")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes the file writer on drop; keep it for the whole run.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level)
            .with_context(|| format!("Invalid log level \"{}\"", logging.level))?,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        // Console layer on stderr; stdout carries command output
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        // File layer (text format without colors)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Load the config file and apply command-line overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = ConfigLoader::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    if let Some(endpoint) = &cli.endpoint {
        config.browser.endpoint = endpoint.clone();
    }
    if let Some(target) = &cli.target {
        config.browser.target = target.clone();
    }

    Ok(config)
}

async fn dispatch(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli)?;
    init_tracing(&config.logging)?;

    let warnings = ConfigValidator::validate(&config)
        .into_result()
        .context("Invalid configuration")?;
    for warning in warnings {
        warn!("{}: {}", warning.path, warning.message);
    }

    let registry = register::build_registry(&config);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => cmd_browser::run(&config, registry).await,
        Commands::Detect => {
            cmd_browser::detect(&config, &registry).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Providers => {
            cmd_browser::print_providers(&registry);
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
