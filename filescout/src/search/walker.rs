use ignore::{DirEntry, WalkBuilder};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::errors::{SearchError, SearchResult};

/// Lazily walks `root`, yielding every regular file below it.
///
/// The root itself must be readable; if it is not, the error is returned
/// before any walking starts. Errors on individual entries further down
/// (permission denied, entries vanishing mid-walk) are classified and skipped. Hidden files
/// and ignore files get no special treatment and symlinks are not followed.
pub fn walk_files(root: &Path) -> SearchResult<impl Iterator<Item = PathBuf>> {
    let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
    fs::read_dir(&root).map_err(|e| SearchError::from_io(&root, e))?;

    debug!("Walking directory: {}", root.display());
    let walker = WalkBuilder::new(&root)
        .standard_filters(false)
        .hidden(false)
        .follow_links(false)
        .build();

    Ok(walker.filter_map(|entry| match entry {
        Ok(entry) if is_regular_file(&entry) => Some(entry.into_path()),
        Ok(_) => None,
        Err(e) => {
            let err = classify_entry_error(e);
            if err.is_recoverable() {
                trace!("Skipping unreadable entry: {}", err);
            } else {
                debug!("Skipping entry after walk error: {}", err);
            }
            None
        }
    }))
}

/// Maps a per-entry walk error onto the search error taxonomy.
fn classify_entry_error(err: ignore::Error) -> SearchError {
    let path = entry_error_path(&err)
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let message = err.to_string();
    match err.into_io_error() {
        Some(source) => SearchError::from_io(&path, source),
        None => SearchError::io_failure(path, io::Error::new(io::ErrorKind::Other, message)),
    }
}

fn entry_error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.as_path()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            entry_error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child.as_path()),
        _ => None,
    }
}

fn is_regular_file(entry: &DirEntry) -> bool {
    entry.file_type().is_some_and(|ft| ft.is_file())
}
