//! In-process storage medium.

use super::{check_capacity, slot_size, StorageBackend, StorageResult};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Map-backed medium with an optional byte capacity.
///
/// Used by tests and by callers that want a throwaway workspace. With a
/// capacity set it behaves like a browser-style quota: writes that would
/// overflow are rejected and the old slot value is kept.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: RefCell<BTreeMap<String, String>>,
    capacity: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a medium that rejects writes once `capacity` bytes
    /// (keys plus values) would be exceeded.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: RefCell::new(BTreeMap::new()),
            capacity: Some(capacity),
        }
    }

    /// Current usage in bytes.
    pub fn used_bytes(&self) -> usize {
        self.slots
            .borrow()
            .iter()
            .map(|(key, value)| slot_size(key, value))
            .sum()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let existing = self
            .slots
            .borrow()
            .get(key)
            .map_or(0, |old| slot_size(key, old));
        check_capacity(self.capacity, self.used_bytes() - existing, key, value)?;
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.slots.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.slots.borrow().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStorage;
    use crate::storage::{StorageBackend, StorageError};

    #[test]
    fn set_then_get_returns_value() {
        let storage = MemoryStorage::new();
        storage.set_item("k", "[1,2]").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("[1,2]"));
        assert_eq!(storage.keys().unwrap(), vec!["k".to_string()]);
    }

    #[test]
    fn quota_rejects_overflow_and_keeps_previous_value() {
        let storage = MemoryStorage::with_capacity(12);
        storage.set_item("key", "12345").unwrap();

        let err = storage.set_item("key", "1234567890").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { capacity: 12, .. }));
        assert_eq!(storage.get_item("key").unwrap().as_deref(), Some("12345"));
    }

    #[test]
    fn overwriting_a_slot_does_not_double_count_it() {
        let storage = MemoryStorage::with_capacity(10);
        storage.set_item("a", "12345678").unwrap();
        storage.set_item("a", "87654321").unwrap();
        assert_eq!(storage.used_bytes(), 9);
    }
}
