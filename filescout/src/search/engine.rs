use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info, warn};

use super::matcher::FileNameMatcher;
use super::pool::{scan_parallel, scan_serial, ScanContext};
use super::walker::walk_files;
use crate::audit::{AuditLog, FALLBACK_TAG};
use crate::errors::{SearchError, SearchResult};
use crate::job::SearchJob;
use crate::metrics::SearchMetrics;
use crate::query::SearchScope;
use crate::results::{SearchOutcome, CANCELLED};

/// Collaborators a search needs besides the job itself
#[derive(Clone)]
pub struct SearchEnv {
    /// Root of `Everywhere` searches and of the fallback pass
    pub home_dir: PathBuf,
    pub audit: Arc<dyn AuditLog>,
}

impl SearchEnv {
    pub fn new(home_dir: impl Into<PathBuf>, audit: Arc<dyn AuditLog>) -> Self {
        Self {
            home_dir: home_dir.into(),
            audit,
        }
    }
}

impl std::fmt::Debug for SearchEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEnv")
            .field("home_dir", &self.home_dir)
            .finish_non_exhaustive()
    }
}

/// Picks the directory phase 1 walks, widening to `home` when the scope is
/// `Everywhere` or the requested root is not an existing directory.
pub fn effective_root(root: &Path, scope: SearchScope, home: &Path) -> (PathBuf, SearchScope) {
    if scope == SearchScope::Everywhere {
        return (home.to_path_buf(), SearchScope::Everywhere);
    }
    if !root.is_dir() {
        debug!(
            "Root {} is not a directory, searching everywhere",
            root.display()
        );
        return (home.to_path_buf(), SearchScope::Everywhere);
    }
    (root.to_path_buf(), SearchScope::Scoped)
}

/// Runs the scoped search and, if it finds nothing, the home-directory fallback.
///
/// Always returns a terminal outcome. Matches collected before a cancellation
/// are discarded.
pub fn run(job: &SearchJob, env: &SearchEnv) -> SearchOutcome {
    let query = job.query();
    let (root, scope) = effective_root(&query.root_path, query.scope, &env.home_dir);
    info!(
        "Starting search for '{}' under {} ({:?})",
        query.pattern,
        root.display(),
        scope
    );

    let _ = env
        .audit
        .begin_session(SystemTime::now(), &root, &query.pattern);

    let outcome = match escalate(job, env, &root, scope) {
        Ok(outcome) => outcome,
        Err(SearchError::Cancelled) => {
            job.matches().clear();
            let _ = env.audit.note(CANCELLED);
            info!("Search cancelled");
            SearchOutcome::Cancelled
        }
        Err(e) => {
            job.matches().clear();
            let _ = env.audit.note(&format!("Error: {}", e));
            warn!("Search failed: {}", e);
            SearchOutcome::Failed(e.to_string())
        }
    };

    let _ = env.audit.end_session();
    outcome
}

fn escalate(
    job: &SearchJob,
    env: &SearchEnv,
    root: &Path,
    scope: SearchScope,
) -> SearchResult<SearchOutcome> {
    let query = job.query();
    let matcher = FileNameMatcher::new(&query.pattern);

    let found = phase_one(job, env, &matcher, root)?;
    if !found.is_empty() {
        info!("Search complete. Found {} files", found.len());
        return Ok(SearchOutcome::CompletedWithMatches(found));
    }

    if scope == SearchScope::Everywhere {
        info!("Search complete. No files found");
        return Ok(SearchOutcome::CompletedEmpty { scope });
    }

    info!(
        "Nothing under {}, falling back to {}",
        root.display(),
        env.home_dir.display()
    );
    let found = phase_two(job, env, &matcher)?;
    if found.is_empty() {
        info!("Fallback complete. No files found");
        Ok(SearchOutcome::CompletedEmpty { scope })
    } else {
        info!("Fallback complete. Found {} files elsewhere", found.len());
        Ok(SearchOutcome::CompletedWithFallback(found))
    }
}

/// Enumerates `root`, then scans the entries in parallel.
fn phase_one(
    job: &SearchJob,
    env: &SearchEnv,
    matcher: &FileNameMatcher,
    root: &Path,
) -> SearchResult<Vec<PathBuf>> {
    let metrics = SearchMetrics::new();
    let token = job.token();

    let mut entries = Vec::new();
    for path in walk_files(root)? {
        if token.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        entries.push(path);
    }
    metrics.record_enumerated(entries.len() as u64);
    debug!("Found {} files to scan", entries.len());

    let ctx = ScanContext {
        matcher,
        token,
        matches: job.matches(),
        audit: env.audit.as_ref(),
        metrics: &metrics,
    };
    let result = scan_parallel(&entries, job.query().worker_count, &ctx);
    metrics.log_stats("scoped");
    result?;

    Ok(job.matches().drain())
}

/// Serial pass over the home directory.
fn phase_two(
    job: &SearchJob,
    env: &SearchEnv,
    matcher: &FileNameMatcher,
) -> SearchResult<Vec<PathBuf>> {
    let metrics = SearchMetrics::new();
    let ctx = ScanContext {
        matcher,
        token: job.token(),
        matches: job.matches(),
        audit: env.audit.as_ref(),
        metrics: &metrics,
    };

    let result = walk_files(&env.home_dir)
        .and_then(|entries| scan_serial(entries, FALLBACK_TAG, &ctx));
    metrics.log_stats("fallback");
    result?;

    Ok(job.matches().drain())
}
