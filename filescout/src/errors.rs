/// Error types for filescout.
///
/// Only a handful of these ever reach a caller. Per-entry problems met while
/// walking a tree (`PermissionDenied`, transient stat failures) are recovered
/// where they happen and traversal continues. A missing search root is not an
/// error either: the engine widens the search to the home directory instead.
/// What is left ends up in a terminal outcome:
///
/// ```rust,ignore
/// match engine::run(&job, &env) {
///     SearchOutcome::Failed(reason) => eprintln!("Error: {}", reason),
///     SearchOutcome::Cancelled => println!("Search cancelled"),
///     other => render(other),
/// }
/// ```
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur during search operations
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Root not found: {0}")]
    RootNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("IO failure at {path}: {source}")]
    IoFailure {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Search cancelled")]
    Cancelled,
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Worker pool error: {0}")]
    WorkerPool(String),
}

impl SearchError {
    pub fn root_not_found(path: impl Into<PathBuf>) -> Self {
        Self::RootNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    /// Classifies an I/O error against the path it happened on.
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::root_not_found(path),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::io_failure(path, source),
        }
    }

    pub fn io_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoFailure {
            path: path.into(),
            source,
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn worker_pool(msg: impl Into<String>) -> Self {
        Self::WorkerPool(msg.into())
    }

    /// True for errors that a walk recovers from by skipping the entry.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::PermissionDenied(_) | Self::RootNotFound(_))
    }
}
