//! Error types for rdfload CLI
//!
//! Setup failures end the process; each message says what to check.

use rdfload_common::RdfLoadError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Connection to Neo4j could not be set up
    #[error("Cannot connect to Neo4j: {0}. Check --neo4j-uri and the NEO4J_USER / NEO4J_PASSWORD credentials.")]
    Connection(String),

    /// Database could not be wiped and prepared before the import
    #[error("Database initialization failed: {0}. Check that the neosemantics (n10s) plugin is installed, or pass --skip-init.")]
    Initialization(String),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}.")]
    Config(String),

    /// Logging settings could not be applied
    #[error("Logging setup failed: {0}. Check LOG_LEVEL, LOG_FORMAT, LOG_FILTER and --log-filter.")]
    Logging(String),

    /// Import pipeline aborted before producing a report
    #[error(transparent)]
    Load(RdfLoadError),

    /// Report could not be serialized
    #[error("Failed to render report: {0}")]
    Render(#[from] serde_json::Error),
}

impl CliError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<RdfLoadError> for CliError {
    fn from(err: RdfLoadError) -> Self {
        match err {
            RdfLoadError::Initialization(msg) => Self::Initialization(msg),
            other => Self::Load(other),
        }
    }
}
