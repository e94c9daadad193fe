//! Relay CLI
//!
//! Send email through Mailjet and manage Mailjet delivery-tracking callbacks.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::RelayConfig;

/// Send mail and manage delivery tracking through Mailjet.
#[derive(Parser, Debug)]
#[command(name = "relay", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(
        short,
        long,
        env = "RELAY_CONFIG",
        default_value = "relay.toml",
        global = true
    )]
    config: PathBuf,

    /// Mailjet API key; overrides the config file.
    #[arg(long, env = "MAILJET_API_KEY", global = true)]
    api_key: Option<String>,

    /// Mailjet API secret; overrides the config file.
    #[arg(long, env = "MAILJET_API_SECRET", hide_env_values = true, global = true)]
    api_secret: Option<String>,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose and send one message.
    Send(commands::send::SendArgs),
    /// Manage delivery-tracking callbacks.
    Tracking(commands::tracking::TrackingArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if !cli.config.exists() {
        tracing::debug!(path = %cli.config.display(), "config file not found, using defaults");
    }
    let config = RelayConfig::load(&cli.config)?.with_overrides(cli.api_key, cli.api_secret);

    match cli.command {
        Command::Send(args) => commands::send::run(&config, &args, &cli.format).await,
        Command::Tracking(args) => commands::tracking::run(&config, &args, &cli.format).await,
    }
}
