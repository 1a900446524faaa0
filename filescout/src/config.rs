use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

use crate::audit::{AuditLog, FileAuditLog, NullAuditLog};
use crate::errors::{SearchError, SearchResult};
use crate::search::SearchEnv;

/// Startup configuration for the search engine.
///
/// # Configuration Locations
///
/// The configuration can be loaded from multiple locations, later entries
/// overriding earlier ones:
/// 1. Global `$HOME/.config/filescout/config.yaml`
/// 2. Local `.filescout.yaml` in the current directory
/// 3. Custom config file specified via `--config` flag
///
/// # Configuration Format
///
/// ```yaml
/// # Number of phase-1 workers (default: CPU cores)
/// worker_count: 4
///
/// # Directory used for "everywhere" searches and the fallback pass
/// home_dir: "/home/user"
///
/// # Session log (default: <home>/Desktop/FileSearchApp/log/search_log.txt)
/// audit_log: "/var/log/filescout.txt"
/// audit_enabled: true
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
///
/// Command-line arguments take precedence over file values; see `merge_with_cli`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of workers in the parallel phase
    #[serde(default = "default_worker_count")]
    pub worker_count: NonZeroUsize,

    /// Home directory override. `None` uses the user's home directory.
    #[serde(default)]
    pub home_dir: Option<PathBuf>,

    /// Audit log location. `None` uses the default under the home directory.
    #[serde(default)]
    pub audit_log: Option<PathBuf>,

    /// Whether to write the audit log at all
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_worker_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_audit_enabled() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            worker_count: default_worker_count(),
            home_dir: None,
            audit_log: None,
            audit_enabled: default_audit_enabled(),
            log_level: default_log_level(),
        }
    }
}

impl SearchConfig {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from the default locations plus a specific file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            dirs::config_dir().map(|p| p.join("filescout/config.yaml")),
            Some(PathBuf::from(".filescout.yaml")),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // An explicit file must exist
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if let Some(workers) = cli.worker_count {
            self.worker_count = workers;
        }
        if cli.home_dir.is_some() {
            self.home_dir = cli.home_dir;
        }
        if cli.audit_log.is_some() {
            self.audit_log = cli.audit_log;
        }
        if cli.no_audit {
            self.audit_enabled = false;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        self
    }

    /// The configured home directory, or the user's home directory
    pub fn resolve_home(&self) -> SearchResult<PathBuf> {
        self.home_dir
            .clone()
            .or_else(dirs::home_dir)
            .ok_or_else(|| SearchError::config_error("Could not determine the home directory"))
    }

    /// Builds the audit sink this configuration asks for
    pub fn audit_log_for(&self, home: &Path) -> Arc<dyn AuditLog> {
        if !self.audit_enabled {
            return Arc::new(NullAuditLog);
        }
        let path = self
            .audit_log
            .clone()
            .unwrap_or_else(|| FileAuditLog::default_path(home));
        Arc::new(FileAuditLog::new(path))
    }

    /// Everything the engine needs to run searches under this configuration
    pub fn search_env(&self) -> SearchResult<SearchEnv> {
        let home = self.resolve_home()?;
        if !home.is_dir() {
            warn!("Home directory {} does not exist", home.display());
        }
        let audit = self.audit_log_for(&home);
        Ok(SearchEnv::new(home, audit))
    }
}

/// Values given on the command line; `None` leaves the file value alone
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub worker_count: Option<NonZeroUsize>,
    pub home_dir: Option<PathBuf>,
    pub audit_log: Option<PathBuf>,
    pub no_audit: bool,
    pub log_level: Option<String>,
}
