//! Neo4j store over Bolt, backed by `neo4rs`
//!
//! `neo4rs` pools connections internally and has no explicit session object,
//! so a session here is a scoped handle onto the pool: every statement runs
//! as its own auto-commit transaction on a pooled connection, the same way a
//! driver session runs un-batched statements.

use super::{GraphStore, Param, Record, RecordStream, Session, SessionBackend, Statement};
use async_trait::async_trait;
use futures::StreamExt;
use neo4rs::{ConfigBuilder, Graph, Query, Row};
use rdfload_common::{RdfLoadError, Result};
use std::collections::HashMap;
use tracing::{debug, info};

/// Default Bolt URI for a local server.
pub const DEFAULT_NEO4J_URI: &str = "bolt://localhost:7687";

/// Default Neo4j user.
pub const DEFAULT_NEO4J_USER: &str = "neo4j";

/// Default Neo4j password.
pub const DEFAULT_NEO4J_PASSWORD: &str = "password";

/// Connection settings for [`Neo4jStore`]
#[derive(Clone)]
pub struct Neo4jConfig {
    pub uri: String,
    pub username: String,
    pub password: String,
    /// Target database; the server default when `None`
    pub database: Option<String>,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_NEO4J_URI.to_string(),
            username: DEFAULT_NEO4J_USER.to_string(),
            password: DEFAULT_NEO4J_PASSWORD.to_string(),
            database: None,
        }
    }
}

impl std::fmt::Debug for Neo4jConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Neo4jConfig")
            .field("uri", &self.uri)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

/// Long-lived connection handle to a Neo4j server
#[derive(Clone)]
pub struct Neo4jStore {
    graph: Graph,
}

impl Neo4jStore {
    /// Build the connection pool for `config`
    pub async fn connect(config: &Neo4jConfig) -> Result<Self> {
        let mut builder = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.username.as_str())
            .password(config.password.as_str());

        if let Some(database) = config.database.as_deref() {
            builder = builder.db(database);
        }

        let neo4j_config = builder
            .build()
            .map_err(|e| RdfLoadError::config(format!("invalid Neo4j settings: {}", e)))?;

        let graph = Graph::connect(neo4j_config).await.map_err(|e| {
            RdfLoadError::connection(format!("failed to connect to Neo4j at {}: {}", config.uri, e))
        })?;

        info!(uri = %config.uri, user = %config.username, "Connected to Neo4j");
        Ok(Self { graph })
    }
}

#[async_trait]
impl GraphStore for Neo4jStore {
    async fn open_session(&self) -> Result<Session> {
        Ok(Session::new(Neo4jSession {
            graph: self.graph.clone(),
            closed: false,
        }))
    }
}

struct Neo4jSession {
    graph: Graph,
    closed: bool,
}

#[async_trait]
impl SessionBackend for Neo4jSession {
    async fn run<'s>(&'s mut self, statement: Statement) -> Result<RecordStream<'s>> {
        if self.closed {
            return Err(RdfLoadError::statement("session already closed"));
        }

        let rows = self
            .graph
            .execute(to_query(&statement))
            .await
            .map_err(|e| RdfLoadError::statement(e.to_string()))?;

        let records = futures::stream::try_unfold(rows, |mut rows| async move {
            match rows.next().await {
                Ok(Some(row)) => Ok(Some((to_record(&row)?, rows))),
                Ok(None) => Ok(None),
                Err(e) => Err(RdfLoadError::protocol(format!("failed to read record: {}", e))),
            }
        });

        Ok(records.boxed())
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        debug!("Released Neo4j session");
        Ok(())
    }
}

fn to_query(statement: &Statement) -> Query {
    statement
        .params()
        .iter()
        .fold(neo4rs::query(statement.text()), |query, (key, value)| match value {
            Param::Text(text) => query.param(key, text.as_str()),
            Param::Integer(n) => query.param(key, *n),
        })
}

fn to_record(row: &Row) -> Result<Record> {
    row.to::<HashMap<String, serde_json::Value>>()
        .map(Record::new)
        .map_err(|e| RdfLoadError::protocol(format!("cannot decode record: {}", e)))
}
