use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod conversation;
mod events;
mod session;
mod transcript;
mod ui;

use config::Config;

#[derive(Parser)]
#[command(name = "nestep")]
#[command(version = "0.1.0")]
#[command(about = "Terminal client for the NeStep support chatbot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask one question without the chat screen
    Ask {
        /// Your question
        question: String,
        /// Also request a web-search enhanced answer
        #[arg(long)]
        web: bool,
    },
    /// List saved conversation transcripts
    Transcripts,
}

/// Log to a file under the app home so the chat screen stays clean.
/// `RUST_LOG` controls verbosity.
fn init_logging(config: &Config) -> Result<()> {
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    init_logging(&config)?;
    tracing::info!(api_base = %config.api_base, "nestep starting");

    match cli.command {
        None => ui::run(config).await,
        Some(Commands::Ask { question, web }) => commands::ask(&config, &question, web).await,
        Some(Commands::Transcripts) => commands::list_transcripts(&config),
    }
}
