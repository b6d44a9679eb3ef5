//! Path resolution
//!
//! Maps a local file path to the URI handed to server-side fetch procedures.
//! When the database runs in a container the same files are usually mounted
//! under a different root, so a container mount replaces everything but the
//! file name. Directory structure is discarded in that case and file names
//! must be unique within the imported directory.
//!
//! Resolution never checks that the file exists; a bad URI only surfaces as a
//! server-side error.

use rdfload_common::{RdfLoadError, Result};
use std::path::{Path, PathBuf};

const FILE_SCHEME: &str = "file://";

/// An input path plus an optional container-mount override
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReference {
    path: PathBuf,
    container_mount: Option<PathBuf>,
}

impl FileReference {
    /// An empty mount override is treated the same as no override.
    pub fn new(path: impl Into<PathBuf>, container_mount: Option<&Path>) -> Self {
        Self {
            path: path.into(),
            container_mount: container_mount
                .filter(|mount| !mount.as_os_str().is_empty())
                .map(Path::to_path_buf),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn container_mount(&self) -> Option<&Path> {
        self.container_mount.as_deref()
    }

    /// Base name used when reporting on this file
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Resolve to a `file://` URI
    pub fn resolve(&self) -> Result<String> {
        resolve_file_uri(&self.path, self.container_mount.as_deref())
    }
}

/// Resolve `path` into a `file://` URI, remapping onto `container_mount` when given
pub fn resolve_file_uri(path: &Path, container_mount: Option<&Path>) -> Result<String> {
    let absolute = std::path::absolute(path).map_err(|source| RdfLoadError::Path {
        path: path.display().to_string(),
        source,
    })?;

    let resolved = match container_mount.filter(|mount| !mount.as_os_str().is_empty()) {
        Some(mount) => match absolute.file_name() {
            Some(name) => mount.join(name),
            None => mount.to_path_buf(),
        },
        None => absolute,
    };

    Ok(format!(
        "{}{}",
        FILE_SCHEME,
        resolved.to_string_lossy().replace('\\', "/")
    ))
}
