//! SHACL validation of the imported graph
//!
//! Three steps, each in its own session and none retried:
//!
//! 1. drop previously loaded shapes
//! 2. load shapes from the schema file
//! 3. run validation and drain every violation record
//!
//! The pass/fail decision is only taken once the violation stream is
//! exhausted.

use crate::graph::{with_session, GraphStore, Record, Statement};
use crate::resolve::FileReference;
use crate::TURTLE_FORMAT;
use futures::TryStreamExt;
use rdfload_common::{RdfLoadError, Result, Violation};
use tracing::{debug, instrument, warn};

const DROP_SHAPES_STATEMENT: &str = "CALL n10s.validation.shacl.dropShapes()";

const IMPORT_SHAPES_STATEMENT: &str = "CALL n10s.validation.shacl.import.fetch($uri, $format)";

const VALIDATE_STATEMENT: &str = "CALL n10s.validation.shacl.validate() \
     YIELD focusNode, nodeType, offendingValue, resultPath, resultMessage, severity";

/// Validate the graph against the shapes in `schema`
///
/// Fails with [`RdfLoadError::ConstraintsNotLoaded`] when the shapes could not
/// be loaded and with [`RdfLoadError::ShaclViolations`] when the graph does
/// not conform. Every violation is logged as it is read.
#[instrument(skip_all, fields(schema = %schema.display_name()))]
pub async fn validate_graph(store: &dyn GraphStore, schema: &FileReference) -> Result<()> {
    drop_shapes(store).await?;

    let uri = schema.resolve()?;
    let shapes = load_shapes(store, uri).await?;
    debug!(shapes, "Loaded shape definitions");

    let violations = collect_violations(store).await?;
    if violations.is_empty() {
        Ok(())
    } else {
        Err(RdfLoadError::ShaclViolations { violations })
    }
}

async fn drop_shapes(store: &dyn GraphStore) -> Result<()> {
    with_session(store, |session| {
        Box::pin(async move {
            let records = session.run(Statement::new(DROP_SHAPES_STATEMENT)).await?;
            records.try_for_each(|_| futures::future::ok(())).await
        })
    })
    .await
}

/// Returns the number of shape rows reported by the server.
async fn load_shapes(store: &dyn GraphStore, uri: String) -> Result<usize> {
    with_session(store, move |session| {
        Box::pin(async move {
            let statement = Statement::new(IMPORT_SHAPES_STATEMENT)
                .param("uri", uri)
                .param("format", TURTLE_FORMAT);

            let mut records = session.run(statement).await?;
            if records.try_next().await?.is_none() {
                return Err(RdfLoadError::ConstraintsNotLoaded);
            }

            records.try_fold(1, |count, _| futures::future::ok(count + 1)).await
        })
    })
    .await
}

async fn collect_violations(store: &dyn GraphStore) -> Result<Vec<Violation>> {
    with_session(store, |session| {
        Box::pin(async move {
            let mut records = session.run(Statement::new(VALIDATE_STATEMENT)).await?;

            let mut violations = Vec::new();
            while let Some(record) = records.try_next().await? {
                let violation = to_violation(&record);
                warn!(
                    focus_node = %violation.focus_node,
                    severity = %violation.severity,
                    "Validation error: {}",
                    violation.message
                );
                violations.push(violation);
            }

            Ok(violations)
        })
    })
    .await
}

fn to_violation(record: &Record) -> Violation {
    let field = |key: &str| record.text(key).unwrap_or_default();

    Violation {
        focus_node: field("focusNode"),
        node_type: field("nodeType"),
        offending_value: field("offendingValue"),
        result_path: field("resultPath"),
        message: field("resultMessage"),
        severity: field("severity"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::graph::scripted::{Reply, ScriptedStore};
    use crate::graph::Param;
    use serde_json::json;
    use std::path::Path;

    fn schema() -> FileReference {
        FileReference::new("/schemas/shapes.ttl", Some(Path::new("/import")))
    }

    fn shape_rows() -> Reply {
        Reply::rows(vec![Record::from_iter([
            ("target", json!("http://ex.org/Person")),
            ("propertyOrRelationshipPath", json!("name")),
            ("param", json!("minCount")),
            ("value", json!(1)),
        ])])
    }

    fn violation_row(focus: &str, message: &str) -> Record {
        Record::from_iter([
            ("focusNode", json!(focus)),
            ("nodeType", json!("Person")),
            ("offendingValue", serde_json::Value::Null),
            ("resultPath", json!("name")),
            ("resultMessage", json!(message)),
            ("severity", json!("http://www.w3.org/ns/shacl#Violation")),
        ])
    }

    #[tokio::test]
    async fn test_conforming_graph_passes() {
        let store = ScriptedStore::new().on("shacl.import.fetch", shape_rows());

        validate_graph(&store, &schema()).await.unwrap();

        let executed: Vec<String> =
            store.executed().iter().map(|s| s.text().to_string()).collect();
        assert_eq!(executed.len(), 3);
        assert!(executed[0].contains("dropShapes"));
        assert!(executed[1].contains("shacl.import.fetch"));
        assert!(executed[2].contains("shacl.validate"));
        assert_eq!(store.sessions_opened(), 3);
        assert_eq!(store.sessions_closed(), 3);
    }

    #[tokio::test]
    async fn test_unloadable_constraints_stop_before_validation() {
        let store = ScriptedStore::new().on("shacl.import.fetch", Reply::rows(vec![]));

        let err = validate_graph(&store, &schema()).await.unwrap_err();

        assert!(matches!(err, RdfLoadError::ConstraintsNotLoaded));
        assert_eq!(err.to_string(), "failed to load constraints file");
        assert_eq!(store.count("shacl.validate"), 0);
        assert_eq!(store.sessions_opened(), store.sessions_closed());
    }

    #[tokio::test]
    async fn test_violations_fail_the_run() {
        let store = ScriptedStore::new()
            .on("shacl.import.fetch", shape_rows())
            .on(
                "shacl.validate",
                Reply::rows(vec![
                    violation_row("http://ex.org/p1", "Less than 1 values on name"),
                    violation_row("http://ex.org/p2", "Value does not have datatype xsd:string"),
                ]),
            );

        let err = validate_graph(&store, &schema()).await.unwrap_err();

        assert_eq!(err.to_string(), "SHACL validation failed");
        match err {
            RdfLoadError::ShaclViolations { violations } => {
                let messages: Vec<&str> = violations.iter().map(|v| v.message.as_str()).collect();
                assert_eq!(
                    messages,
                    vec!["Less than 1 values on name", "Value does not have datatype xsd:string"]
                );
                assert_eq!(violations[0].focus_node, "http://ex.org/p1");
                assert_eq!(violations[0].offending_value, "");
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_broken_violation_stream_is_an_error() {
        let store = ScriptedStore::new()
            .on("shacl.import.fetch", shape_rows())
            .on(
                "shacl.validate",
                Reply::BrokenStream(vec![violation_row("http://ex.org/p1", "missing name")]),
            );

        let err = validate_graph(&store, &schema()).await.unwrap_err();
        assert!(matches!(err, RdfLoadError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_drop_failure_is_not_retried() {
        let store = ScriptedStore::new().on("dropShapes", Reply::fail("connection refused"));

        let err = validate_graph(&store, &schema()).await.unwrap_err();

        assert!(matches!(err, RdfLoadError::Statement(_)));
        assert_eq!(store.executed().len(), 1);
    }

    #[tokio::test]
    async fn test_shapes_fetched_from_resolved_uri() {
        let store = ScriptedStore::new().on("shacl.import.fetch", shape_rows());

        validate_graph(&store, &schema()).await.unwrap();

        let executed = store.executed();
        let params = executed[1].params();
        assert_eq!(params["uri"], Param::Text("file:///import/shapes.ttl".to_string()));
        assert_eq!(params["format"], Param::Text("Turtle".to_string()));
    }
}
