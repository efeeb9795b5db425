//! Durable key/value media behind the persisted store.
//!
//! # Responsibility
//! - Define the minimal slot contract (`get`, `set`, `remove`, `keys`).
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - Values are UTF-8 JSON text; the medium never interprets them.
//! - A rejected write leaves the previously stored value in place.

use thiserror::Error;

mod memory;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure reported by a storage medium.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The write would grow the medium past its configured capacity.
    #[error("storage quota exceeded: need {required} bytes, capacity {capacity}")]
    QuotaExceeded { required: usize, capacity: usize },
    #[error("sqlite storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Slot-oriented durable medium.
///
/// Single-threaded by contract; implementations use interior mutability
/// instead of `&mut self` so one medium can be shared by several bindings.
pub trait StorageBackend {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove_item(&self, key: &str) -> StorageResult<()>;
    fn keys(&self) -> StorageResult<Vec<String>>;
}

/// Byte usage counted the same way by every bounded medium.
pub(crate) fn slot_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}

pub(crate) fn check_capacity(
    capacity: Option<usize>,
    used_without_slot: usize,
    key: &str,
    value: &str,
) -> StorageResult<()> {
    let Some(capacity) = capacity else {
        return Ok(());
    };
    let required = used_without_slot + slot_size(key, value);
    if required > capacity {
        return Err(StorageError::QuotaExceeded { required, capacity });
    }
    Ok(())
}
