pub mod audit;
pub mod config;
pub mod errors;
pub mod job;
pub mod metrics;
pub mod query;
pub mod results;
pub mod search;

pub use audit::{AuditLog, FileAuditLog, MemoryAuditLog, NullAuditLog};
pub use config::{CliOverrides, SearchConfig};
pub use errors::{SearchError, SearchResult};
pub use job::{CancellationToken, JobController, SearchJob};
pub use query::{SearchQuery, SearchScope};
pub use results::{MatchSet, SearchOutcome};
pub use search::SearchEnv;
