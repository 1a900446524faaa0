use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Where a search is allowed to look
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    /// Restricted to one starting directory, with a home-directory fallback
    Scoped,
    /// Rooted at the home directory, no fallback
    Everywhere,
}

/// A filename search request. Immutable once handed to the job controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Directory to search under when the scope is `Scoped`
    pub root_path: PathBuf,
    /// Case-insensitive substring to look for in file names
    pub pattern: String,
    pub scope: SearchScope,
    /// Number of phase-1 workers
    pub worker_count: NonZeroUsize,
}

impl SearchQuery {
    /// A search restricted to `root_path`.
    pub fn scoped(
        root_path: impl Into<PathBuf>,
        pattern: impl Into<String>,
        worker_count: NonZeroUsize,
    ) -> Self {
        Self {
            root_path: root_path.into(),
            pattern: pattern.into(),
            scope: SearchScope::Scoped,
            worker_count,
        }
    }

    /// A search of the whole home directory.
    pub fn everywhere(
        home: impl Into<PathBuf>,
        pattern: impl Into<String>,
        worker_count: NonZeroUsize,
    ) -> Self {
        Self {
            root_path: home.into(),
            pattern: pattern.into(),
            scope: SearchScope::Everywhere,
            worker_count,
        }
    }

    /// Builds a query from what a user typed into the directory box.
    ///
    /// An empty directory means "everywhere". Otherwise the input is tried
    /// relative to `home` first, then as an absolute path. Anything that does
    /// not name an existing directory falls back to an everywhere search.
    pub fn from_input(
        dir_input: &str,
        pattern: impl Into<String>,
        worker_count: NonZeroUsize,
        home: &Path,
    ) -> Self {
        let dir_input = dir_input.trim();
        if dir_input.is_empty() {
            return Self::everywhere(home, pattern, worker_count);
        }

        let under_home = home.join(dir_input);
        if under_home.is_dir() {
            return Self::scoped(under_home, pattern, worker_count);
        }

        let as_given = Path::new(dir_input);
        if as_given.is_absolute() && as_given.is_dir() {
            return Self::scoped(as_given, pattern, worker_count);
        }

        Self::everywhere(home, pattern, worker_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn workers() -> NonZeroUsize {
        NonZeroUsize::new(2).unwrap()
    }

    #[test]
    fn test_empty_input_searches_everywhere() {
        let home = tempdir().unwrap();
        let query = SearchQuery::from_input("  ", "notes", workers(), home.path());
        assert_eq!(query.scope, SearchScope::Everywhere);
        assert_eq!(query.root_path, home.path());
    }

    #[test]
    fn test_input_relative_to_home() {
        let home = tempdir().unwrap();
        fs::create_dir_all(home.path().join("Documents/work")).unwrap();

        let query = SearchQuery::from_input("Documents/work", "notes", workers(), home.path());
        assert_eq!(query.scope, SearchScope::Scoped);
        assert_eq!(query.root_path, home.path().join("Documents/work"));
    }

    #[test]
    fn test_absolute_input() {
        let home = tempdir().unwrap();
        let elsewhere = tempdir().unwrap();
        let input = elsewhere.path().to_str().unwrap();

        let query = SearchQuery::from_input(input, "notes", workers(), home.path());
        assert_eq!(query.scope, SearchScope::Scoped);
        assert_eq!(query.root_path, elsewhere.path());
    }

    #[test]
    fn test_unknown_directory_widens_to_everywhere() {
        let home = tempdir().unwrap();
        let query = SearchQuery::from_input("no/such/dir", "notes", workers(), home.path());
        assert_eq!(query.scope, SearchScope::Everywhere);
        assert_eq!(query.root_path, home.path());
        assert_eq!(query.pattern, "notes");
    }
}
