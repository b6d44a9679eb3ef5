//! rdfload Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging, and error handling for the rdfload workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`RdfLoadError`] and the [`Result`] alias used by
//!   the import and validation operators
//! - **Logging**: `tracing` subscriber setup shared by every binary
//! - **Types**: records reported back from the graph database
//!
//! # Example
//!
//! ```no_run
//! use rdfload_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging(&LogConfig::default().with_env()?)?;
//!     tracing::info!("ready");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{RdfLoadError, Result};
pub use types::Violation;
