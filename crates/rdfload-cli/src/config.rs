//! Configuration assembly for rdfload CLI
//!
//! Command-line flags (with environment fallbacks handled by clap) are folded
//! into one validated [`ImportConfig`].

use crate::error::{CliError, Result};
use crate::Cli;
use rdfload_common::logging::{LogConfig, LogLevel};
use rdfload_ingest::batch::BatchOptions;
use rdfload_ingest::graph::neo4j::Neo4jConfig;
use rdfload_ingest::import::RetryPolicy;
use std::path::PathBuf;

/// URI schemes understood by the Bolt driver.
pub const SUPPORTED_URI_SCHEMES: [&str; 6] =
    ["bolt", "bolt+s", "bolt+ssc", "neo4j", "neo4j+s", "neo4j+ssc"];

/// Everything one run needs
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub input_dir: PathBuf,
    pub connection: Neo4jConfig,
    pub batch: BatchOptions,
    /// Render the report as JSON
    pub json: bool,
}

impl ImportConfig {
    /// Build and validate the configuration from parsed arguments
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = Self {
            input_dir: cli.input_dir.clone(),
            connection: Neo4jConfig {
                uri: cli.neo4j_uri.trim().to_string(),
                username: cli.username.clone(),
                password: cli.password.clone(),
                database: cli.database.clone().filter(|db| !db.is_empty()),
            },
            batch: BatchOptions {
                initialize: !cli.skip_init,
                container_mount: cli
                    .container_mount
                    .as_deref()
                    .filter(|mount| !mount.is_empty())
                    .map(PathBuf::from),
                schema_file: cli.schema_file.clone(),
                retry: RetryPolicy::default(),
            },
            json: cli.json,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let uri = &self.connection.uri;
        if uri.is_empty() {
            return Err(CliError::config("Neo4j URI cannot be empty"));
        }

        let scheme = uri.split("://").next().unwrap_or_default();
        if !uri.contains("://") || !SUPPORTED_URI_SCHEMES.contains(&scheme) {
            return Err(CliError::config(format!(
                "unsupported Neo4j URI '{}', expected one of {}",
                uri,
                SUPPORTED_URI_SCHEMES.join(", ")
            )));
        }

        if self.connection.username.is_empty() && !self.connection.password.is_empty() {
            return Err(CliError::config("a password was given without a username"));
        }

        Ok(())
    }
}

/// Logging settings for a run
///
/// `--verbose` picks the base level, `LOG_*` values from `env` override it,
/// and explicit `--log-format` / `--log-filter` flags win over both.
pub fn log_config(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Result<LogConfig> {
    let level = if cli.verbose { LogLevel::Debug } else { LogLevel::Info };

    let mut config = LogConfig::new(level)
        .include_targets(cli.verbose)
        .overlay(env)
        .map_err(|e| CliError::Logging(format!("{:#}", e)))?;

    if let Some(format) = cli.log_format {
        config = config.format(format);
    }
    if let Some(directives) = &cli.log_filter {
        config = config.directives(directives.as_str());
    }

    Ok(config)
}
