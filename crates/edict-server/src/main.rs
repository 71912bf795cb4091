//! Edict service binary
//!
//! Consumes notice-processing requests from the queue and serves the status
//! endpoints.

use anyhow::Context;
use clap::Parser;
use edict_server::{config::AppConfig, start_server, telemetry};
use std::path::PathBuf;

/// Bidding-notice checklist extraction service
#[derive(Debug, Parser)]
#[command(name = "edict")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file path (TOML); environment variables override it
    #[arg(short, long, env = "EDICT_CONFIG")]
    config: Option<PathBuf>,

    /// Validate the configuration, print a summary and exit
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    telemetry::init(&config.log_level).context("Failed to initialise logging")?;

    if cli.check_config {
        config.validate().context("Invalid configuration")?;
        println!("Configuration OK\n{}", config.summary());
        return Ok(());
    }

    start_server(config).await.context("Edict service failed")?;
    Ok(())
}
