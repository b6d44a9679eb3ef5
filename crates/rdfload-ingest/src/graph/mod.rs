//! Graph database sessions
//!
//! A [`GraphStore`] is the long-lived connection handle; it hands out
//! short-lived [`Session`]s, one per logical unit of work. Sessions carry no
//! state between calls and are never shared. [`with_session`] is the only way
//! the operators obtain one, and it releases the session on every exit path.
//!
//! Results come back as a [`RecordStream`]: lazy, finite and not restartable.

pub mod neo4j;

#[cfg(test)]
pub(crate) mod scripted;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use rdfload_common::Result;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Lazily consumed result records of one statement
pub type RecordStream<'s> = BoxStream<'s, Result<Record>>;

/// Parameter value bound into a [`Statement`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Text(String),
    Integer(i64),
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Text(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Text(value)
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Param::Integer(value)
    }
}

/// A parameterized Cypher statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    text: String,
    params: BTreeMap<String, Param>,
}

impl Statement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<Param>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn params(&self) -> &BTreeMap<String, Param> {
        &self.params
    }
}

/// One result row, keyed by column name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    pub fn new(fields: HashMap<String, Value>) -> Self {
        Self { fields }
    }

    /// Whether the record carries a `key` column at all, null or not.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Raw value of `key`; a JSON null counts as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|value| !value.is_null())
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    /// Render `key` as text; strings are returned verbatim, other values as JSON.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Connection handle able to open sessions
#[async_trait]
pub trait GraphStore: Send + Sync {
    async fn open_session(&self) -> Result<Session>;
}

/// Backend half of a [`Session`]
#[async_trait]
pub trait SessionBackend: Send {
    /// Execute `statement`; failures here are transport failures.
    async fn run<'s>(&'s mut self, statement: Statement) -> Result<RecordStream<'s>>;

    /// Release the underlying resources.
    async fn close(&mut self) -> Result<()>;
}

/// A single-use database session
pub struct Session {
    backend: Box<dyn SessionBackend>,
}

impl Session {
    pub fn new(backend: impl SessionBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Execute a statement and return its records as a stream
    pub async fn run(&mut self, statement: Statement) -> Result<RecordStream<'_>> {
        debug!(statement = statement.text(), "Running statement");
        self.backend.run(statement).await
    }

    /// Consumes the session so it cannot be closed twice.
    pub async fn close(mut self) -> Result<()> {
        self.backend.close().await
    }
}

/// Run `work` against a fresh session and release the session afterwards
///
/// The session is closed whether `work` succeeds or fails; a failure to close
/// is logged and does not replace the result of `work`.
///
/// ```ignore
/// let uri = uri.to_string();
/// let summary = with_session(store, move |session| {
///     Box::pin(async move { fetch_summary(session, uri).await })
/// })
/// .await?;
/// ```
pub async fn with_session<T, F>(store: &dyn GraphStore, work: F) -> Result<T>
where
    F: for<'s> FnOnce(&'s mut Session) -> BoxFuture<'s, Result<T>>,
{
    let mut session = store.open_session().await?;
    let result = work(&mut session).await;

    if let Err(e) = session.close().await {
        warn!(error = %e, "Failed to release graph session");
    }

    result
}
