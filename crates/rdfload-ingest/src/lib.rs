//! rdfload Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Batch import of Turtle files into Neo4j (through the neosemantics `n10s`
//! procedures) and SHACL validation of the resulting graph.
//!
//! # Components
//!
//! - **[`resolve`]**: maps local paths to `file://` URIs the server can read
//! - **[`graph`]**: scoped sessions over a [`graph::GraphStore`]
//! - **[`import`]**: the retried import-one-file workflow
//! - **[`validate`]**: the three-step SHACL validation workflow
//! - **[`schema`]**: one-time database initialization
//! - **[`batch`]**: discovery and sequencing of a whole directory
//!
//! # Example
//!
//! ```no_run
//! use rdfload_ingest::batch::{run_batch, BatchOptions};
//! use rdfload_ingest::graph::neo4j::{Neo4jConfig, Neo4jStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Neo4jStore::connect(&Neo4jConfig::default()).await?;
//!     let report = run_batch(&store, "./triples".as_ref(), &BatchOptions::default()).await?;
//!     println!("{} files processed", report.files.len());
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod graph;
pub mod import;
pub mod resolve;
pub mod schema;
pub mod validate;

/// RDF serialization passed to every `n10s` fetch procedure.
pub const TURTLE_FORMAT: &str = "Turtle";
