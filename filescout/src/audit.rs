//! Audit trail of search sessions.
//!
//! The audit log is a best-effort side channel: every method returns an
//! `io::Result`, and the engine discards it. A full disk or an unwritable log
//! directory never aborts a search.

use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Tag used for matches found by the serial fallback pass
pub const FALLBACK_TAG: &str = "fallback";

/// Tag for a phase-1 worker
pub fn worker_tag(id: usize) -> String {
    format!("worker-{}", id)
}

/// Sink for timestamped search events
pub trait AuditLog: Send + Sync {
    /// Records one matched path.
    fn record(&self, timestamp: SystemTime, tag: &str, path: &Path) -> io::Result<()>;

    /// Marks the start of a search session.
    fn begin_session(&self, _timestamp: SystemTime, _root: &Path, _pattern: &str) -> io::Result<()> {
        Ok(())
    }

    /// Records a free-form session event such as a cancellation or an error.
    fn note(&self, _message: &str) -> io::Result<()> {
        Ok(())
    }

    /// Marks the end of a search session.
    fn end_session(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Audit log that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAuditLog;

impl AuditLog for NullAuditLog {
    fn record(&self, _timestamp: SystemTime, _tag: &str, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

/// Appends sessions to a plain-text file, creating its directory on first use
#[derive(Debug)]
pub struct FileAuditLog {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl FileAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: Mutex::new(None),
        }
    }

    /// Default location under the user's home directory
    pub fn default_path(home: &Path) -> PathBuf {
        home.join("Desktop")
            .join("FileSearchApp")
            .join("log")
            .join("search_log.txt")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut guard = self.file.lock();
        if guard.is_none() {
            if let Some(dir) = self.path.parent() {
                fs::create_dir_all(dir)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            *guard = Some(file);
        }
        match guard.as_mut() {
            Some(file) => writeln!(file, "{}", line),
            None => Ok(()),
        }
    }
}

impl AuditLog for FileAuditLog {
    fn record(&self, timestamp: SystemTime, tag: &str, path: &Path) -> io::Result<()> {
        self.write_line(&format!(
            "{} [{}] {}",
            humantime::format_rfc3339_seconds(timestamp),
            tag,
            path.display()
        ))
    }

    fn begin_session(&self, timestamp: SystemTime, root: &Path, pattern: &str) -> io::Result<()> {
        self.write_line(&format!(
            "=== Search: {} ===",
            humantime::format_rfc3339_seconds(timestamp)
        ))?;
        self.write_line(&format!("Dir: {}", root.display()))?;
        self.write_line(&format!("Query: {}", pattern))
    }

    fn note(&self, message: &str) -> io::Result<()> {
        self.write_line(message)
    }

    fn end_session(&self) -> io::Result<()> {
        self.write_line("=== End Search ===\n")?;
        match self.file.lock().as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

/// One event captured by [`MemoryAuditLog`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub tag: String,
    pub path: PathBuf,
}

/// Keeps match records in memory; used by embedders that display them and by tests
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    records: Mutex<Vec<AuditRecord>>,
    notes: Mutex<Vec<String>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().clone()
    }

    pub fn notes(&self) -> Vec<String> {
        self.notes.lock().clone()
    }
}

impl AuditLog for MemoryAuditLog {
    fn record(&self, _timestamp: SystemTime, tag: &str, path: &Path) -> io::Result<()> {
        self.records.lock().push(AuditRecord {
            tag: tag.to_string(),
            path: path.to_path_buf(),
        });
        Ok(())
    }

    fn note(&self, message: &str) -> io::Result<()> {
        self.notes.lock().push(message.to_string());
        Ok(())
    }
}
