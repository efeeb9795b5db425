//! Ordered schema steps for the slot database.
//!
//! # Invariants
//! - Step versions start at 1 and increase by exactly one.
//! - `PRAGMA user_version` always equals the last applied step.

use crate::db::{DbError, DbResult};
use log::debug;
use rusqlite::Connection;

/// `(version, sql)` pairs in application order.
const STEPS: &[(u32, &str)] = &[(1, include_str!("0001_storage_slots.sql"))];

/// Schema versions before and after a migration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationOutcome {
    pub from: u32,
    pub to: u32,
}

impl MigrationOutcome {
    pub fn applied_steps(self) -> u32 {
        self.to - self.from
    }
}

/// Highest schema version this build understands.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |(version, _)| *version)
}

/// Brings `conn` to [`latest_version`] inside one transaction.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<MigrationOutcome> {
    let from: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest = latest_version();
    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    let pending: Vec<&(u32, &str)> = STEPS.iter().filter(|(version, _)| *version > from).collect();
    if !pending.is_empty() {
        let tx = conn.transaction()?;
        for (version, sql) in pending {
            tx.execute_batch(sql)?;
            tx.pragma_update(None, "user_version", version)?;
            debug!("event=db_migrate module=db status=ok version={version}");
        }
        tx.commit()?;
    }

    Ok(MigrationOutcome { from, to: latest })
}
