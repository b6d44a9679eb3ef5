//! rdfload CLI Library
//!
//! Command-line front end for importing a directory of Turtle files into Neo4j
//! and validating the resulting graph against SHACL shapes.
//!
//! # Overview
//!
//! - **Import**: every `*.ttl` file directly under the input directory
//! - **Initialization**: wipe and prepare the database first (`--skip-init` to skip)
//! - **Validation**: check the graph against `--schema-file` when given
//!
//! Per-file and validation failures are reported but never change the exit
//! status; only setup failures (arguments, connection, initialization) do.
//! An input directory without `.ttl` files, or one that does not exist, is an
//! empty run.

pub mod commands;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::ImportConfig;
pub use error::{CliError, Result};

use clap::Parser;
use rdfload_common::logging::LogFormat;
use rdfload_ingest::graph::neo4j::{DEFAULT_NEO4J_PASSWORD, DEFAULT_NEO4J_URI, DEFAULT_NEO4J_USER};
use std::path::PathBuf;

/// rdfload - Import RDF files into Neo4j
#[derive(Parser, Debug)]
#[command(name = "rdfload")]
#[command(author, version, about = "Import Turtle files into Neo4j and validate them with SHACL", long_about = None)]
pub struct Cli {
    /// Directory containing the .ttl files to import
    pub input_dir: PathBuf,

    /// Neo4j database URI
    #[arg(long, env = "NEO4J_URI", default_value = DEFAULT_NEO4J_URI)]
    pub neo4j_uri: String,

    /// Neo4j username
    #[arg(short, long, env = "NEO4J_USER", default_value = DEFAULT_NEO4J_USER)]
    pub username: String,

    /// Neo4j password
    #[arg(
        short,
        long,
        env = "NEO4J_PASSWORD",
        default_value = DEFAULT_NEO4J_PASSWORD,
        hide_env_values = true,
        hide_default_value = true
    )]
    pub password: String,

    /// Neo4j database name (server default when omitted)
    #[arg(long, env = "NEO4J_DATABASE")]
    pub database: Option<String>,

    /// SHACL constraints file; validation is skipped when omitted
    #[arg(long)]
    pub schema_file: Option<PathBuf>,

    /// Path where the input files are mounted inside the Neo4j container
    #[arg(long)]
    pub container_mount: Option<String>,

    /// Do not wipe and initialize the database before importing
    #[arg(long)]
    pub skip_init: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Log line format: text or json
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Extra log filter directives, e.g. "neo4rs=warn,rdfload_ingest=debug"
    #[arg(long, value_name = "DIRECTIVES")]
    pub log_filter: Option<String>,

    /// Verbose output (debug level, with module targets)
    #[arg(short, long)]
    pub verbose: bool,
}
