//! Database initialization
//!
//! Wipes the graph, configures neosemantics to ignore vocabulary URIs and
//! ensures the uniqueness constraint on resource URIs. Every step is safe to
//! repeat: the delete is unconditional and the constraint uses `IF NOT EXISTS`.

use crate::graph::{with_session, GraphStore, Statement};
use futures::TryStreamExt;
use rdfload_common::Result;
use tracing::{debug, info};

/// Initialization statements, run in order.
pub const INIT_STATEMENTS: [&str; 3] = [
    "MATCH (n) DETACH DELETE n",
    "CALL n10s.graphconfig.init({handleVocabUris: 'IGNORE'})",
    "CREATE CONSTRAINT n10s_unique_uri IF NOT EXISTS FOR (r:Resource) REQUIRE r.uri IS UNIQUE",
];

/// Prepare the database for a fresh import
pub async fn initialize_database(store: &dyn GraphStore) -> Result<()> {
    with_session(store, |session| {
        Box::pin(async move {
            for text in INIT_STATEMENTS {
                debug!(statement = text, "Initializing database");
                let records = session.run(Statement::new(text)).await?;
                records.try_for_each(|_| futures::future::ok(())).await?;
            }
            Ok(())
        })
    })
    .await?;

    info!("Database initialized");
    Ok(())
}
