//! Search jobs and the single-flight controller that runs them.
//!
//! A [`JobController`] owns at most one [`SearchJob`] at a time. The job runs
//! on its own background thread so the caller never blocks; the caller only
//! ever starts, cancels and polls.

use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info};

use crate::query::SearchQuery;
use crate::results::{MatchSet, SearchOutcome};
use crate::search::engine::{self, SearchEnv};

/// One-shot abort signal shared by a job and its workers
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Default::default()
    }

    /// Requests cancellation. Calling it again has no further effect.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// A submitted query together with the state its run produces
#[derive(Debug)]
pub struct SearchJob {
    query: SearchQuery,
    token: CancellationToken,
    matches: MatchSet,
    outcome: Mutex<SearchOutcome>,
}

impl SearchJob {
    pub fn new(query: SearchQuery) -> Self {
        Self {
            query,
            token: CancellationToken::new(),
            matches: MatchSet::new(),
            outcome: Mutex::new(SearchOutcome::Running),
        }
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn matches(&self) -> &MatchSet {
        &self.matches
    }

    /// Snapshot of the current outcome
    pub fn outcome(&self) -> SearchOutcome {
        self.outcome.lock().clone()
    }

    fn finish(&self, outcome: SearchOutcome) {
        *self.outcome.lock() = outcome;
    }
}

/// Runs at most one search at a time.
///
/// A new search is accepted only when no job is running, and only after the
/// previous job's thread has been joined. Requests made while a job is running
/// are rejected, not queued.
pub struct JobController {
    env: SearchEnv,
    job: Mutex<Option<Arc<SearchJob>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl JobController {
    pub fn new(env: SearchEnv) -> Self {
        Self {
            env,
            job: Mutex::new(None),
            handle: Mutex::new(None),
        }
    }

    pub fn env(&self) -> &SearchEnv {
        &self.env
    }

    /// Starts `query` on a background thread.
    ///
    /// Returns `false` without doing anything if a job is still running.
    pub fn start_search(&self, query: SearchQuery) -> bool {
        let mut handle = self.handle.lock();

        if let Some(current) = self.job.lock().as_ref() {
            if current.outcome() == SearchOutcome::Running {
                debug!("Search already running, ignoring start request");
                return false;
            }
        }

        // The previous job is terminal; wait for its thread to exit.
        if let Some(previous) = handle.take() {
            if previous.join().is_err() {
                error!("Previous search thread panicked");
            }
        }

        let job = Arc::new(SearchJob::new(query));
        *handle = spawn_job(Arc::clone(&job), self.env.clone());
        *self.job.lock() = Some(job);
        true
    }

    /// Cancels the running job. Safe to call repeatedly or with no job.
    pub fn cancel(&self) {
        if let Some(job) = self.job.lock().as_ref() {
            if !job.token().is_cancelled() {
                info!("Cancelling search");
            }
            job.token().cancel();
        }
    }

    /// Current outcome of the most recent job, or `Idle` if there was none
    pub fn poll_outcome(&self) -> SearchOutcome {
        self.job
            .lock()
            .as_ref()
            .map(|job| job.outcome())
            .unwrap_or(SearchOutcome::Idle)
    }

    /// True while a job is running
    pub fn is_running(&self) -> bool {
        self.poll_outcome() == SearchOutcome::Running
    }

    /// Blocks until the current job's thread has exited and returns its outcome.
    pub fn wait(&self) -> SearchOutcome {
        let mut handle = self.handle.lock();
        if let Some(running) = handle.take() {
            if running.join().is_err() {
                error!("Search thread panicked");
            }
        }
        self.poll_outcome()
    }
}

impl Drop for JobController {
    fn drop(&mut self) {
        self.cancel();
        if let Some(running) = self.handle.get_mut().take() {
            let _ = running.join();
        }
    }
}

fn spawn_job(job: Arc<SearchJob>, env: SearchEnv) -> Option<JoinHandle<()>> {
    let thread_job = Arc::clone(&job);
    let spawned = thread::Builder::new()
        .name("filescout-search".to_string())
        .spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| engine::run(&thread_job, &env)));
            let outcome = result.unwrap_or_else(|_| {
                error!("Search thread panicked");
                thread_job.matches().clear();
                SearchOutcome::Failed("internal error: search thread panicked".to_string())
            });
            thread_job.finish(outcome);
        });

    match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            error!("Failed to start search thread: {}", e);
            job.finish(SearchOutcome::Failed(format!(
                "could not start search thread: {}",
                e
            )));
            None
        }
    }
}
