/// Search result types.
///
/// A running job accumulates matched paths in a [`MatchSet`], which every
/// phase-1 worker appends to under one mutex. When the job finishes the set is
/// drained into exactly one terminal [`SearchOutcome`]:
///
/// ```rust,ignore
/// let outcome = match phase_one {
///     hits if !hits.is_empty() => SearchOutcome::CompletedWithMatches(hits),
///     _ if scope == SearchScope::Everywhere => SearchOutcome::CompletedEmpty { scope },
///     _ => fallback(),
/// };
/// ```
///
/// Nothing in this module retains enumerated entries or partitions; only the
/// matches survive the phase that produced them.
use parking_lot::Mutex;
use serde::Serialize;
use std::path::PathBuf;

use crate::query::SearchScope;

pub const NOT_FOUND: &str = "File not found";
pub const NOT_FOUND_IN_DIRECTORY: &str = "File not found in this directory";
pub const FOUND_ELSEWHERE: &str = "Found elsewhere:";
pub const CANCELLED: &str = "Search cancelled";

/// Append-only collection of matched paths shared by the workers of one job
#[derive(Debug, Default)]
pub struct MatchSet {
    paths: Mutex<Vec<PathBuf>>,
}

impl MatchSet {
    /// Creates an empty match set
    pub fn new() -> Self {
        Default::default()
    }

    /// Appends a matched path
    pub fn push(&self, path: PathBuf) {
        self.paths.lock().push(path);
    }

    pub fn len(&self) -> usize {
        self.paths.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.lock().is_empty()
    }

    /// Takes every path collected so far, leaving the set empty
    pub fn drain(&self) -> Vec<PathBuf> {
        std::mem::take(&mut *self.paths.lock())
    }

    /// Drops everything collected so far
    pub fn clear(&self) {
        self.paths.lock().clear();
    }
}

/// State of a search job as seen by a caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// No job has been submitted yet
    Idle,
    Running,
    Cancelled,
    /// Phase 1 found files under the effective root
    CompletedWithMatches(Vec<PathBuf>),
    /// Nothing found; `scope` tells which not-found message applies
    CompletedEmpty { scope: SearchScope },
    /// Nothing under the requested directory, but the home fallback found files
    CompletedWithFallback(Vec<PathBuf>),
    Failed(String),
}

impl SearchOutcome {
    /// True once the job can no longer change state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Idle | Self::Running)
    }

    /// Matched paths carried by this outcome, if any
    pub fn paths(&self) -> &[PathBuf] {
        match self {
            Self::CompletedWithMatches(paths) | Self::CompletedWithFallback(paths) => paths,
            _ => &[],
        }
    }

    /// Lines to show the user for this outcome
    pub fn report_lines(&self) -> Vec<String> {
        match self {
            Self::Idle => Vec::new(),
            Self::Running => vec!["Searching...".to_string()],
            Self::Cancelled => vec![CANCELLED.to_string()],
            Self::Failed(reason) => vec![format!("Error: {}", reason)],
            Self::CompletedEmpty {
                scope: SearchScope::Everywhere,
            } => vec![NOT_FOUND.to_string()],
            Self::CompletedEmpty {
                scope: SearchScope::Scoped,
            } => vec![NOT_FOUND_IN_DIRECTORY.to_string()],
            Self::CompletedWithMatches(paths) => {
                paths.iter().map(|p| p.display().to_string()).collect()
            }
            Self::CompletedWithFallback(paths) => {
                let mut lines = Vec::with_capacity(paths.len() + 2);
                lines.push(NOT_FOUND_IN_DIRECTORY.to_string());
                lines.push(FOUND_ELSEWHERE.to_string());
                lines.extend(paths.iter().map(|p| p.display().to_string()));
                lines
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_match_set_new() {
        let set = MatchSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(set.drain().is_empty());
    }

    #[test]
    fn test_match_set_concurrent_appends() {
        let set = Arc::new(MatchSet::new());
        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let set = Arc::clone(&set);
                thread::spawn(move || {
                    for i in 0..50 {
                        set.push(PathBuf::from(format!("/w{}/f{}", worker, i)));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(set.len(), 200);

        // Each worker's own appends keep their relative order
        let paths = set.drain();
        let worker_two: Vec<_> = paths
            .iter()
            .filter(|p| p.starts_with("/w2"))
            .cloned()
            .collect();
        let expected: Vec<_> = (0..50)
            .map(|i| PathBuf::from(format!("/w2/f{}", i)))
            .collect();
        assert_eq!(worker_two, expected);
        assert!(set.is_empty());
    }

    #[test]
    fn test_clear() {
        let set = MatchSet::new();
        set.push(PathBuf::from("/a"));
        assert_eq!(set.len(), 1);
        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!SearchOutcome::Idle.is_terminal());
        assert!(!SearchOutcome::Running.is_terminal());
        assert!(SearchOutcome::Cancelled.is_terminal());
        assert!(SearchOutcome::Failed("x".into()).is_terminal());
        assert!(SearchOutcome::CompletedEmpty {
            scope: SearchScope::Scoped
        }
        .is_terminal());
    }

    #[test]
    fn test_report_lines() {
        assert_eq!(SearchOutcome::Cancelled.report_lines(), vec![CANCELLED]);
        assert_eq!(
            SearchOutcome::Failed("No such file or directory".into()).report_lines(),
            vec!["Error: No such file or directory"]
        );
        assert_eq!(
            SearchOutcome::CompletedEmpty {
                scope: SearchScope::Everywhere
            }
            .report_lines(),
            vec![NOT_FOUND]
        );
        assert_eq!(
            SearchOutcome::CompletedEmpty {
                scope: SearchScope::Scoped
            }
            .report_lines(),
            vec![NOT_FOUND_IN_DIRECTORY]
        );

        let fallback = SearchOutcome::CompletedWithFallback(vec![PathBuf::from("/home/u/x.log")]);
        assert_eq!(
            fallback.report_lines(),
            vec![NOT_FOUND_IN_DIRECTORY, FOUND_ELSEWHERE, "/home/u/x.log"]
        );
        assert_eq!(fallback.paths(), &[PathBuf::from("/home/u/x.log")]);
    }

    #[test]
    fn test_outcome_json_shape() {
        let json = serde_json::to_value(SearchOutcome::CompletedWithMatches(vec![
            PathBuf::from("/tmp/a.txt"),
        ]))
        .unwrap();
        assert_eq!(json["status"], "completed_with_matches");
        assert_eq!(json["detail"][0], "/tmp/a.txt");

        let json = serde_json::to_value(SearchOutcome::CompletedEmpty {
            scope: SearchScope::Scoped,
        })
        .unwrap();
        assert_eq!(json["detail"]["scope"], "scoped");
    }
}
