//! SQLite-backed storage medium.
//!
//! # Invariants
//! - One row per slot in `storage_slots`; writes are upserts.
//! - The connection must have migrations applied (see `db::open_db`).

use super::{check_capacity, StorageBackend, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Durable slot medium over a migrated SQLite connection.
pub struct SqliteStorage {
    conn: Connection,
    capacity: Option<usize>,
}

impl SqliteStorage {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            capacity: None,
        }
    }

    /// Limits total stored bytes (keys plus values).
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Borrows the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn used_bytes_excluding(&self, key: &str) -> StorageResult<usize> {
        let used: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0)
             FROM storage_slots
             WHERE key <> ?1;",
            [key],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(used).unwrap_or(0))
    }
}

impl StorageBackend for SqliteStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM storage_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.capacity.is_some() {
            check_capacity(self.capacity, self.used_bytes_excluding(key)?, key, value)?;
        }

        self.conn.execute(
            "INSERT INTO storage_slots (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM storage_slots WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM storage_slots ORDER BY key ASC;")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}
