use rayon::ThreadPoolBuilder;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::{debug, trace};

use super::matcher::FileNameMatcher;
use super::partition::partition;
use crate::audit::{worker_tag, AuditLog};
use crate::errors::{SearchError, SearchResult};
use crate::job::CancellationToken;
use crate::metrics::SearchMetrics;
use crate::results::MatchSet;

/// Everything a worker reads or appends to while scanning its partition
pub struct ScanContext<'a> {
    pub matcher: &'a FileNameMatcher,
    pub token: &'a CancellationToken,
    pub matches: &'a MatchSet,
    pub audit: &'a dyn AuditLog,
    pub metrics: &'a SearchMetrics,
}

/// Scans `entries` with one worker per partition and waits for all of them.
///
/// Each worker runs on its own thread of a pool sized to the partition count.
/// Returns `Err(SearchError::Cancelled)` if the token was set by the time the
/// workers were joined; whatever they appended stays in the match set for the
/// caller to discard.
pub fn scan_parallel(
    entries: &[PathBuf],
    workers: NonZeroUsize,
    ctx: &ScanContext<'_>,
) -> SearchResult<()> {
    let partitions = partition(entries.len(), workers);
    if partitions.is_empty() {
        debug!("No entries to scan, starting no workers");
        return check_cancelled(ctx.token);
    }

    debug!(
        "Scanning {} entries with {} workers",
        entries.len(),
        partitions.len()
    );

    let pool = ThreadPoolBuilder::new()
        .num_threads(partitions.len())
        .thread_name(|i| format!("filescout-worker-{}", i))
        .build()
        .map_err(|e| SearchError::worker_pool(e.to_string()))?;

    pool.scope(|scope| {
        for (id, range) in partitions.into_iter().enumerate() {
            let slice = &entries[range];
            scope.spawn(move |_| scan_partition(id, slice, ctx));
        }
    });

    check_cancelled(ctx.token)
}

/// Scans entries one by one on the calling thread, tagging audit records with `tag`.
pub fn scan_serial<I>(entries: I, tag: &str, ctx: &ScanContext<'_>) -> SearchResult<()>
where
    I: IntoIterator<Item = PathBuf>,
{
    for path in entries {
        if ctx.token.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        ctx.metrics.record_enumerated(1);
        ctx.metrics.record_scanned();
        if ctx.matcher.is_match(&path) {
            ctx.matches.push(path.clone());
            record_match(tag, &path, ctx);
        }
    }
    check_cancelled(ctx.token)
}

fn scan_partition(id: usize, entries: &[PathBuf], ctx: &ScanContext<'_>) {
    ctx.metrics.record_worker_started();
    debug!("Worker {} starting on {} entries", id, entries.len());

    let tag = worker_tag(id);
    for path in entries {
        if ctx.token.is_cancelled() {
            ctx.metrics.record_worker_cancelled();
            debug!("Worker {} stopping on cancellation", id);
            return;
        }
        ctx.metrics.record_scanned();
        if ctx.matcher.is_match(path) {
            ctx.matches.push(path.clone());
            record_match(&tag, path, ctx);
        }
    }

    debug!("Worker {} finished", id);
}

fn record_match(tag: &str, path: &std::path::Path, ctx: &ScanContext<'_>) {
    ctx.metrics.record_match();
    trace!("[{}] match: {}", tag, path.display());
    if let Err(e) = ctx.audit.record(SystemTime::now(), tag, path) {
        trace!("Audit log write failed: {}", e);
    }
}

fn check_cancelled(token: &CancellationToken) -> SearchResult<()> {
    if token.is_cancelled() {
        Err(SearchError::Cancelled)
    } else {
        Ok(())
    }
}
