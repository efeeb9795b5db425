//! Core domain logic for Pitiqq.
//! This crate is the single source of truth for persisted state, record
//! invariants and derived views.

pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;
pub mod store;
pub mod view;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::record::{Record, RecordId};
pub use service::content_service::ContentService;
pub use service::finance_service::{DollarOperationRequest, FinanceService};
pub use service::planning_service::PlanningService;
pub use service::snapshot::{
    backup_file_name, export_snapshot, import_snapshot, ImportError, ImportReport, Snapshot,
};
pub use service::workspace::{Clock, FixedClock, SystemClock, Workspace};
pub use service::{ServiceError, ServiceResult};
pub use storage::{MemoryStorage, SqliteStorage, StorageBackend, StorageError};
pub use store::{Collection, CollectionError, Persisted, Store, StoreConfig, StoreError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
