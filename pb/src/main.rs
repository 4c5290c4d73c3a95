//! promptbox - modal text prompt for the terminal
//!
//! CLI entry point: ask a single question, run the demo host or print the
//! effective configuration.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info};

use promptbox::cli::{AskArgs, Cli, Command};
use promptbox::config::Config;
use promptbox::notice::NoticeBoard;
use promptbox::tui::{self, AnswerOutcome};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("promptbox")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("promptbox.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log level from config file before the full load
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Ask(args)) => cmd_ask(&config, &args).await,
        Some(Command::Demo) | None => cmd_demo(&config).await,
        Some(Command::Config) => cmd_config(&config),
    }
}

/// Ask one question; print the answer, or exit 1 when it was cancelled
async fn cmd_ask(config: &Config, args: &AskArgs) -> Result<()> {
    debug!(message = %args.message, "cmd_ask: called");
    let settings = config.controller_settings()?;
    let prompt = args.to_prompt_config().context("Invalid prompt options")?;
    let notices = NoticeBoard::new(config.notices.duration());

    let outcome = tui::run_ask(prompt, settings, notices).await?;

    match outcome {
        Some(AnswerOutcome::Answered(answer)) => {
            info!("cmd_ask: answered");
            println!("{}", answer);
            Ok(())
        }
        Some(AnswerOutcome::Cancelled) | None => {
            info!("cmd_ask: cancelled");
            std::process::exit(1);
        }
    }
}

async fn cmd_demo(config: &Config) -> Result<()> {
    debug!("cmd_demo: called");
    let settings = config.controller_settings()?;
    let notices = NoticeBoard::new(config.notices.duration());
    tui::run_demo(settings, notices).await
}

fn cmd_config(config: &Config) -> Result<()> {
    debug!("cmd_config: called");
    print!("{}", config.to_yaml()?);
    Ok(())
}
