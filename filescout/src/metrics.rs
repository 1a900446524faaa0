use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// Counters shared by the workers of one search phase
#[derive(Debug, Clone)]
pub struct SearchMetrics {
    entries_enumerated: Arc<AtomicU64>,
    entries_scanned: Arc<AtomicU64>,
    matches: Arc<AtomicU64>,
    workers_started: Arc<AtomicU64>,
    workers_cancelled: Arc<AtomicU64>,
}

impl SearchMetrics {
    /// Creates a new SearchMetrics instance
    pub fn new() -> Self {
        Self {
            entries_enumerated: Arc::new(AtomicU64::new(0)),
            entries_scanned: Arc::new(AtomicU64::new(0)),
            matches: Arc::new(AtomicU64::new(0)),
            workers_started: Arc::new(AtomicU64::new(0)),
            workers_cancelled: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records how many entries the walker produced
    pub fn record_enumerated(&self, count: u64) {
        self.entries_enumerated.fetch_add(count, Ordering::Relaxed);
    }

    /// Records one entry compared against the pattern
    pub fn record_scanned(&self) {
        self.entries_scanned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_match(&self) {
        self.matches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_worker_started(&self) {
        self.workers_started.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a worker that stopped early because the job was cancelled
    pub fn record_worker_cancelled(&self) {
        self.workers_cancelled.fetch_add(1, Ordering::Relaxed);
    }

    /// Gets current statistics
    pub fn get_stats(&self) -> SearchStats {
        SearchStats {
            entries_enumerated: self.entries_enumerated.load(Ordering::Relaxed),
            entries_scanned: self.entries_scanned.load(Ordering::Relaxed),
            matches: self.matches.load(Ordering::Relaxed),
            workers_started: self.workers_started.load(Ordering::Relaxed),
            workers_cancelled: self.workers_cancelled.load(Ordering::Relaxed),
        }
    }

    /// Logs current statistics for `phase`
    pub fn log_stats(&self, phase: &str) {
        let stats = self.get_stats();
        info!(
            "Search stats ({}):\n\
             Entries enumerated: {}\n\
             Entries scanned: {}\n\
             Matches: {}\n\
             Workers started/cancelled: {}/{}",
            phase,
            stats.entries_enumerated,
            stats.entries_scanned,
            stats.matches,
            stats.workers_started,
            stats.workers_cancelled
        );
    }
}

impl Default for SearchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of [`SearchMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    pub entries_enumerated: u64,
    pub entries_scanned: u64,
    pub matches: u64,
    pub workers_started: u64,
    pub workers_cancelled: u64,
}
