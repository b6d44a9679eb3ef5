//! rdfload - Main entry point

use clap::Parser;
use rdfload_cli::config::log_config;
use rdfload_cli::{Cli, CliError};
use rdfload_common::logging::{init_logging, LogConfig, LogLevel};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // Values from a local .env file fill in NEO4J_* before argument parsing
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // The import still runs when logging cannot be set up as requested
    let log_config = log_config(&cli, |key| std::env::var(key).ok()).unwrap_or_else(|e| {
        eprintln!("Warning: {}", e);
        LogConfig::new(if cli.verbose { LogLevel::Debug } else { LogLevel::Info })
    });
    if let Err(e) = init_logging(&log_config) {
        eprintln!("Warning: {}", CliError::Logging(format!("{:#}", e)));
    }

    if let Err(e) = rdfload_cli::commands::import::run(&cli).await {
        error!(error = %e, "Import aborted");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
