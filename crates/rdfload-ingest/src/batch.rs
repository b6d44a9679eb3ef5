//! Batch orchestration
//!
//! Initializes the database (optional), imports every `*.ttl` file directly
//! under the input directory one at a time, then validates the graph once if a
//! schema file was given. A failing file never stops the batch; each outcome is
//! logged and reported on its own. Only initialization and discovery failures
//! abort the run.
//!
//! A directory without Turtle files (or one that does not exist) ends the run
//! right after initialization, with no validation.
//!
//! Files are processed in the order discovery yields them. Callers must not
//! rely on that order; reports carry the file name.

use crate::graph::GraphStore;
use crate::import::{import_file, ImportOutcome, RetryPolicy};
use crate::resolve::FileReference;
use crate::schema::initialize_database;
use crate::validate::validate_graph;
use rdfload_common::{RdfLoadError, Result, Violation};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Settings for [`run_batch`]
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Wipe and prepare the database before importing
    pub initialize: bool,
    /// Root under which the database server sees the input files
    pub container_mount: Option<PathBuf>,
    /// SHACL shapes to validate against; validation is skipped when `None`
    pub schema_file: Option<PathBuf>,
    pub retry: RetryPolicy,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            initialize: true,
            container_mount: None,
            schema_file: None,
            retry: RetryPolicy::default(),
        }
    }
}

/// Result of importing one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Loaded { triples_loaded: i64 },
    Rejected { message: String },
    Error { message: String },
}

impl From<Result<ImportOutcome>> for FileStatus {
    fn from(result: Result<ImportOutcome>) -> Self {
        match result {
            Ok(ImportOutcome::Success { triples_loaded }) => FileStatus::Loaded { triples_loaded },
            Ok(ImportOutcome::Failure { message }) => FileStatus::Rejected { message },
            Err(e) => FileStatus::Error {
                message: e.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// Base name of the file
    pub file: String,
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileReport {
    pub fn is_success(&self) -> bool {
        matches!(self.status, FileStatus::Loaded { .. })
    }

    /// Human-readable outcome
    pub fn message(&self) -> String {
        match &self.status {
            FileStatus::Loaded { triples_loaded } => format!("{} triples loaded", triples_loaded),
            FileStatus::Rejected { message } => message.clone(),
            FileStatus::Error { message } => format!("Error importing: {}", message),
        }
    }
}

/// Result of the validation step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationSummary {
    Passed,
    Failed {
        message: String,
        violations: Vec<Violation>,
    },
}

impl From<Result<()>> for ValidationSummary {
    fn from(result: Result<()>) -> Self {
        match result {
            Ok(()) => ValidationSummary::Passed,
            Err(e) => {
                let message = e.to_string();
                let violations = match e {
                    RdfLoadError::ShaclViolations { violations } => violations,
                    _ => Vec::new(),
                };
                ValidationSummary::Failed { message, violations }
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    /// `None` when no schema file was given
    pub validation: Option<ValidationSummary>,
}

/// All `*.ttl` files directly under `dir`
///
/// A missing directory yields no files; callers that need it to exist must
/// check beforehand.
pub fn discover_turtle_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = Path::new(&escaped).join("*.ttl");
    let pattern = pattern.to_string_lossy();

    let entries = glob::glob(&pattern)
        .map_err(|e| RdfLoadError::Pattern(format!("{}: {}", pattern, e)))?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {},
            Err(e) => warn!(error = %e, "Skipping unreadable directory entry"),
        }
    }

    Ok(files)
}

/// Import every Turtle file under `input_dir` and optionally validate the graph
pub async fn run_batch(
    store: &dyn GraphStore,
    input_dir: &Path,
    options: &BatchOptions,
) -> Result<BatchReport> {
    if options.initialize {
        initialize_database(store)
            .await
            .map_err(|e| RdfLoadError::Initialization(e.to_string()))?;
    }

    let files = discover_turtle_files(input_dir)?;
    if files.is_empty() {
        info!(dir = %input_dir.display(), "No .ttl files found");
        return Ok(BatchReport::default());
    }
    info!(count = files.len(), dir = %input_dir.display(), "Importing Turtle files");

    let mut report = BatchReport::default();
    for path in files {
        let file = FileReference::new(path, options.container_mount.as_deref());
        let status = FileStatus::from(import_file(store, &file, &options.retry).await);

        let file_report = FileReport {
            file: file.display_name(),
            path: file.path().to_path_buf(),
            status,
        };

        match &file_report.status {
            FileStatus::Loaded { .. } => info!(file = %file_report.file, "{}", file_report.message()),
            FileStatus::Rejected { .. } => warn!(file = %file_report.file, "{}", file_report.message()),
            FileStatus::Error { .. } => error!(file = %file_report.file, "{}", file_report.message()),
        }

        report.files.push(file_report);
    }

    if let Some(schema_file) = &options.schema_file {
        let schema = FileReference::new(schema_file, options.container_mount.as_deref());
        let summary = ValidationSummary::from(validate_graph(store, &schema).await);

        match &summary {
            ValidationSummary::Passed => info!("Validation passed"),
            ValidationSummary::Failed { message, violations } => {
                warn!(violations = violations.len(), "Validation failed: {}", message)
            },
        }

        report.validation = Some(summary);
    }

    Ok(report)
}
