/// The concurrent filename search engine.
///
/// A search runs in up to two phases:
///
/// 1. **Scoped phase**: the effective root is walked into a list of regular
///    files, the list is split into one contiguous partition per worker, and
///    the workers scan their partitions in parallel, appending matches to the
///    job's shared match set.
/// 2. **Fallback phase**: only when a scoped search found nothing, the home
///    directory is walked and scanned serially on the job thread.
///
/// ```rust,ignore
/// let job = SearchJob::new(SearchQuery::scoped("/tmp/project", "read", workers));
/// let env = SearchEnv::new(home, Arc::new(NullAuditLog));
/// match engine::run(&job, &env) {
///     SearchOutcome::CompletedWithMatches(paths) => show(paths),
///     other => show_lines(other.report_lines()),
/// }
/// ```
///
/// Every worker checks the job's cancellation token before each entry, so a
/// cancel request is honoured as soon as the filesystem call in flight on
/// each worker returns.
pub mod engine;
pub mod matcher;
pub mod partition;
pub mod pool;
pub mod walker;

pub use engine::{run, SearchEnv};
pub use matcher::FileNameMatcher;
pub use partition::partition;
pub use walker::walk_files;
