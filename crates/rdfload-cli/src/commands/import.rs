//! `rdfload <INPUT_DIR>` command implementation
//!
//! Connects to Neo4j, runs the batch and prints the report. Per-file and
//! validation failures are part of the report; only setup failures return
//! an error.

use crate::config::ImportConfig;
use crate::error::{CliError, Result};
use crate::Cli;
use colored::Colorize;
use rdfload_ingest::batch::{run_batch, BatchReport, ValidationSummary};
use rdfload_ingest::graph::neo4j::Neo4jStore;
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

/// Run the import described by `cli`
pub async fn run(cli: &Cli) -> Result<()> {
    let config = ImportConfig::from_cli(cli)?;
    debug!(config = ?config, "Resolved configuration");

    let store = Neo4jStore::connect(&config.connection)
        .await
        .map_err(|e| CliError::Connection(e.to_string()))?;

    let report = run_batch(&store, &config.input_dir, &config.batch).await?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report, &config.input_dir));
    }

    Ok(())
}

/// Human-readable report
pub fn render_report(report: &BatchReport, input_dir: &Path) -> String {
    let mut out = String::new();

    if report.files.is_empty() {
        let _ = writeln!(out, "No .ttl files found in {}", input_dir.display());
    } else {
        let _ = writeln!(out, "{}", "Imported files:".cyan().bold());
        for file in &report.files {
            let mark = if file.is_success() {
                "✓".green()
            } else {
                "✗".red()
            };
            let _ = writeln!(out, "  {} {}: {}", mark, file.file, file.message());
        }
    }

    match &report.validation {
        None => {},
        Some(ValidationSummary::Passed) => {
            let _ = writeln!(out);
            let _ = writeln!(out, "{} Validation passed", "✓".green());
        },
        Some(ValidationSummary::Failed { message, violations }) => {
            let _ = writeln!(out);
            let _ = writeln!(out, "{} Validation: {}", "✗".red(), message);
            for violation in violations {
                let _ = writeln!(out, "    - {}", violation);
            }
        },
    }

    out
}
