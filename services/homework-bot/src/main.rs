//! Homework bot CLI
//!
//! Command-line interface for the homework review status notifier.

use std::path::PathBuf;

use clap::Parser;
use homework_bot::{load_config, Config, Secrets};
use tracing::Level;

#[derive(Parser)]
#[command(name = "homework-bot")]
#[command(about = "Homework review status notifier for Telegram")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, log_level={:?}",
        args.config,
        args.log_level
    );

    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {:?}", path),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => return Err(e.into()),
    }

    let config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    let secrets = Secrets::from_env().inspect_err(|e| {
        tracing::error!("{}; the bot cannot start", e);
    })?;

    tracing::info!("Starting homework bot");
    tracing::debug!("Configuration: {:?}, {:?}", config, secrets);

    homework_bot::run(config, secrets).await?;

    Ok(())
}
