//! Error types for rdfload

use crate::types::Violation;
use thiserror::Error;

/// Result type alias for rdfload operations
pub type Result<T> = std::result::Result<T, RdfLoadError>;

/// Main error type for rdfload
#[derive(Error, Debug)]
pub enum RdfLoadError {
    #[error("Cannot resolve path '{path}': {source}")]
    Path {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Statement failed: {0}")]
    Statement(String),

    #[error("Unexpected result shape: {0}")]
    Protocol(String),

    #[error("failed after {attempts} attempts: {last}")]
    ImportExhausted { attempts: u32, last: String },

    #[error("failed to initialize database: {0}")]
    Initialization(String),

    #[error("failed to load constraints file")]
    ConstraintsNotLoaded,

    #[error("SHACL validation failed")]
    ShaclViolations { violations: Vec<Violation> },

    #[error("Invalid file pattern: {0}")]
    Pattern(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RdfLoadError {
    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a statement execution error
    pub fn statement(msg: impl Into<String>) -> Self {
        Self::Statement(msg.into())
    }

    /// Create a protocol-shape error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the failure came from the transport and may succeed on a later attempt.
    ///
    /// Protocol-shape errors and definitive server answers are never transient.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Statement(_))
    }
}
