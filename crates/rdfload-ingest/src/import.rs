//! Import of a single Turtle file
//!
//! Each attempt runs `n10s.rdf.import.fetch` in a fresh session and classifies
//! the answer as an [`AttemptOutcome`]:
//!
//! - `Loaded`: a positive `triplesLoaded`, the only success.
//! - `Rejected`: zero triples with an `extraInfo` column, even an empty or
//!   null one. Definitive, never retried.
//! - `Inconclusive`: zero triples and no `extraInfo` column. Retried without backoff.
//!
//! Transport failures are retried after a fixed backoff until the attempt
//! budget runs out. A result that cannot be read is a protocol fault and ends
//! the import immediately.

use crate::graph::{with_session, GraphStore, Record, Statement};
use crate::resolve::FileReference;
use crate::TURTLE_FORMAT;
use futures::TryStreamExt;
use rdfload_common::{RdfLoadError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Attempts made per file before giving up.
pub const MAX_IMPORT_ATTEMPTS: u32 = 3;

/// Fixed delay after a failed attempt.
pub const IMPORT_BACKOFF: Duration = Duration::from_secs(1);

/// Node cache size hint passed to the import procedure.
pub const NODE_CACHE_SIZE: i64 = 15000;

const IMPORT_STATEMENT: &str =
    "CALL n10s.rdf.import.fetch($uri, $format, {nodeCacheSize: $nodeCacheSize})";

/// Attempt budget and backoff for [`import_file`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_IMPORT_ATTEMPTS,
            backoff: IMPORT_BACKOFF,
        }
    }
}

/// Final answer for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImportOutcome {
    Success { triples_loaded: i64 },
    Failure { message: String },
}

impl ImportOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ImportOutcome::Success { .. })
    }
}

impl std::fmt::Display for ImportOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportOutcome::Success { triples_loaded } => write!(f, "{} triples loaded", triples_loaded),
            ImportOutcome::Failure { message } => write!(f, "{}", message),
        }
    }
}

/// Classification of a single import attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Loaded(i64),
    Rejected(String),
    Inconclusive,
}

impl AttemptOutcome {
    /// Classify the summary record returned by the import procedure
    ///
    /// The presence of the `extraInfo` column decides between `Rejected` and
    /// `Inconclusive`, not its content: the procedure answers an empty Turtle
    /// file with `extraInfo: ""`.
    pub fn from_record(record: &Record) -> Result<Self> {
        let loaded = record.get_i64("triplesLoaded").ok_or_else(|| {
            RdfLoadError::protocol("import result has no integer 'triplesLoaded' field")
        })?;

        if loaded > 0 {
            return Ok(AttemptOutcome::Loaded(loaded));
        }

        if record.contains_key("extraInfo") {
            Ok(AttemptOutcome::Rejected(record.text("extraInfo").unwrap_or_default()))
        } else {
            Ok(AttemptOutcome::Inconclusive)
        }
    }
}

/// Import one file, retrying transient failures
///
/// Returns `Ok` for both a successful load and a definitive rejection by the
/// server; `Err` means no definitive answer could be obtained.
#[instrument(skip_all, fields(file = %file.display_name()))]
pub async fn import_file(
    store: &dyn GraphStore,
    file: &FileReference,
    policy: &RetryPolicy,
) -> Result<ImportOutcome> {
    let max_attempts = policy.max_attempts.max(1);
    let mut last_failure = String::from("no attempt made");

    for attempt in 1..=max_attempts {
        // Resolved per attempt; a path error is never retried.
        let uri = file.resolve()?;
        debug!(attempt, uri = %uri, "Importing");

        match attempt_import(store, uri).await {
            Ok(AttemptOutcome::Loaded(triples_loaded)) => {
                return Ok(ImportOutcome::Success { triples_loaded });
            },
            Ok(AttemptOutcome::Rejected(info)) => {
                return Ok(ImportOutcome::Failure {
                    message: format!("No triples loaded. Extra info: {}", info),
                });
            },
            Ok(AttemptOutcome::Inconclusive) => {
                warn!(
                    attempt,
                    max_attempts, "No triples loaded and no reason given by the server, retrying"
                );
                last_failure = "server loaded no triples and reported no reason".to_string();
            },
            Err(e) if e.is_transient() => {
                warn!(attempt, max_attempts, error = %e, "Import attempt failed");
                last_failure = e.to_string();

                if attempt < max_attempts {
                    tokio::time::sleep(policy.backoff).await;
                }
            },
            Err(e) => return Err(e),
        }
    }

    Err(RdfLoadError::ImportExhausted {
        attempts: max_attempts,
        last: last_failure,
    })
}

/// Run one import call in its own session and classify the single result record
async fn attempt_import(store: &dyn GraphStore, uri: String) -> Result<AttemptOutcome> {
    with_session(store, move |session| {
        Box::pin(async move {
            let statement = Statement::new(IMPORT_STATEMENT)
                .param("uri", uri)
                .param("format", TURTLE_FORMAT)
                .param("nodeCacheSize", NODE_CACHE_SIZE);

            let mut records = session.run(statement).await?;

            let record = records
                .try_next()
                .await
                .map_err(unreadable)?
                .ok_or_else(|| RdfLoadError::protocol("import procedure returned no record"))?;

            if records.try_next().await.map_err(unreadable)?.is_some() {
                return Err(RdfLoadError::protocol("import procedure returned more than one record"));
            }

            AttemptOutcome::from_record(&record)
        })
    })
    .await
}

/// Once the call went through, failing to read its result is not retried.
fn unreadable(e: RdfLoadError) -> RdfLoadError {
    if e.is_transient() {
        RdfLoadError::protocol(format!("cannot read import result: {}", e))
    } else {
        e
    }
}
