//! Typed CRUD over a sequence-valued slot.
//!
//! # Invariants
//! - Insertion order is preserved; views re-sort copies, never the slot.
//! - Missing ids make `update`/`modify`/`replace`/`remove` a no-op.
//! - A record id assigned by `append` never changes afterwards.

use super::persisted::{Persisted, Store, StoreResult};
use crate::model::record::{Record, RecordId};
use log::debug;
use serde_json::Value;
use thiserror::Error;

pub type CollectionResult<T> = Result<T, CollectionError>;

#[derive(Debug, Error)]
pub enum CollectionError {
    /// The patch was not a JSON object.
    #[error("patch for `{id}` must be a JSON object")]
    PatchNotObject { id: RecordId },
    /// Merging the patch produced a record that no longer deserializes.
    #[error("patch for `{id}` produced an invalid record: {source}")]
    InvalidPatch {
        id: RecordId,
        #[source]
        source: serde_json::Error,
    },
}

/// Named, persisted, ordered list of records.
pub struct Collection<R: Record> {
    slot: Persisted<Vec<R>>,
}

impl<R: Record> Collection<R> {
    /// Binds the collection slot `name`, defaulting to an empty list.
    pub fn bind(store: &Store, name: &str) -> StoreResult<Self> {
        Ok(Self {
            slot: store.bind_with(name, Vec::new(), |store| store.read_items(name))?,
        })
    }

    pub fn name(&self) -> &str {
        self.slot.name()
    }

    pub fn items(&self) -> &[R] {
        self.slot.get()
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn find(&self, id: &RecordId) -> Option<&R> {
        self.items().iter().find(|record| record.id() == id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.find(id).is_some()
    }

    /// Assigns a fresh id, appends the record and returns the stored copy.
    pub fn append(&mut self, mut record: R) -> R {
        record.set_id(RecordId::generate());
        let stored = record.clone();
        self.slot.update(|items| items.push(record));
        debug!(
            "event=collection_append module=store status=ok collection={} len={}",
            self.name(),
            self.len()
        );
        stored
    }

    /// Shallow-merges the top-level fields of `patch` onto the record `id`.
    ///
    /// The record id is kept even when the patch carries an `id` field.
    /// Returns `Ok(false)` when no record matches.
    ///
    /// # Errors
    /// - `PatchNotObject` when `patch` is not a JSON object.
    /// - `InvalidPatch` when the merged fields do not form a valid record.
    pub fn update(&mut self, id: &RecordId, patch: &Value) -> CollectionResult<bool> {
        let Some(fields) = patch.as_object() else {
            return Err(CollectionError::PatchNotObject { id: id.clone() });
        };
        let Some(existing) = self.find(id) else {
            return Ok(false);
        };

        let invalid = |source| CollectionError::InvalidPatch {
            id: id.clone(),
            source,
        };
        let mut merged = serde_json::to_value(existing).map_err(invalid)?;
        if let Some(target) = merged.as_object_mut() {
            for (field, value) in fields {
                target.insert(field.clone(), value.clone());
            }
        }
        let mut record: R = serde_json::from_value(merged).map_err(invalid)?;
        record.set_id(id.clone());

        Ok(self.replace(id, record))
    }

    /// Applies a typed in-place mutation to the record `id`.
    ///
    /// Returns `false` (and writes nothing) when no record matches.
    pub fn modify(&mut self, id: &RecordId, apply: impl FnOnce(&mut R)) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.slot.update(|items| {
            let record = &mut items[index];
            apply(record);
            record.set_id(id.clone());
        });
        true
    }

    /// Replaces the record `id` with `record`, keeping the id.
    pub fn replace(&mut self, id: &RecordId, mut record: R) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        record.set_id(id.clone());
        self.slot.update(|items| items[index] = record);
        true
    }

    /// Removes the record `id`; returns whether anything was removed.
    pub fn remove(&mut self, id: &RecordId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.slot
            .update(|items| items.retain(|record| record.id() != id));
        debug!(
            "event=collection_remove module=store status=ok collection={} len={}",
            self.name(),
            self.len()
        );
        true
    }

    /// Replaces the whole collection content.
    pub fn replace_all(&mut self, records: Vec<R>) {
        self.slot.set(records);
    }

    pub fn clear(&mut self) {
        self.slot.set(Vec::new());
    }

    /// Re-reads the collection from storage, element by element.
    pub fn reload(&mut self) {
        self.slot.reload_with(Store::read_items);
    }

    fn position(&self, id: &RecordId) -> Option<usize> {
        self.items().iter().position(|record| record.id() == id)
    }
}

impl<R: Record + std::fmt::Debug> std::fmt::Debug for Collection<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name())
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Collection, CollectionError};
    use crate::model::finance::Goal;
    use crate::model::record::{Record, RecordId};
    use crate::storage::{MemoryStorage, StorageBackend};
    use crate::store::Store;
    use serde_json::json;

    fn goals(store: &Store) -> Collection<Goal> {
        Collection::bind(store, "goals").unwrap()
    }

    fn trip() -> Goal {
        Goal {
            name: "Trip".to_string(),
            target: 1000.0,
            ..Goal::default()
        }
    }

    #[test]
    fn append_assigns_id_and_find_returns_equal_record() {
        let store = Store::new(MemoryStorage::new());
        let mut goals = goals(&store);

        let created = goals.append(trip());
        assert!(!created.id().as_str().is_empty());

        let found = goals.find(created.id()).unwrap();
        assert_eq!(found, &Goal {
            id: created.id().clone(),
            ..trip()
        });
    }

    #[test]
    fn append_generates_distinct_ids() {
        let store = Store::new(MemoryStorage::new());
        let mut goals = goals(&store);
        let a = goals.append(trip());
        let b = goals.append(trip());
        assert_ne!(a.id(), b.id());
        assert_eq!(goals.len(), 2);
    }

    #[test]
    fn update_and_remove_of_missing_id_leave_collection_unchanged() {
        let store = Store::new(MemoryStorage::new());
        let mut goals = goals(&store);
        goals.append(trip());
        let before = goals.items().to_vec();
        let missing = RecordId::from("nope");

        assert!(!goals.update(&missing, &json!({"name": "x"})).unwrap());
        assert!(!goals.modify(&missing, |goal| goal.current = 5.0));
        assert!(!goals.remove(&missing));
        assert_eq!(goals.items(), before.as_slice());
    }

    #[test]
    fn update_merges_shallowly_and_keeps_id() {
        let store = Store::new(MemoryStorage::new());
        let mut goals = goals(&store);
        let created = goals.append(trip());

        let changed = goals
            .update(created.id(), &json!({"current": 250, "id": "hijack"}))
            .unwrap();
        assert!(changed);

        let stored = goals.find(created.id()).unwrap();
        assert_eq!(stored.current, 250.0);
        assert_eq!(stored.name, "Trip");
        assert!(goals.find(&RecordId::from("hijack")).is_none());
    }

    #[test]
    fn update_rejects_non_object_and_invalid_patches() {
        let store = Store::new(MemoryStorage::new());
        let mut goals = goals(&store);
        let created = goals.append(trip());

        let err = goals.update(created.id(), &json!([1, 2])).unwrap_err();
        assert!(matches!(err, CollectionError::PatchNotObject { .. }));

        let err = goals
            .update(created.id(), &json!({"contributions": "lots"}))
            .unwrap_err();
        assert!(matches!(err, CollectionError::InvalidPatch { .. }));
        assert_eq!(goals.find(created.id()).unwrap().target, 1000.0);
    }

    #[test]
    fn removing_twice_is_same_as_once() {
        let store = Store::new(MemoryStorage::new());
        let mut goals = goals(&store);
        let keep = goals.append(trip());
        let gone = goals.append(trip());

        assert!(goals.remove(gone.id()));
        let after_first = goals.items().to_vec();
        assert!(!goals.remove(gone.id()));
        assert_eq!(goals.items(), after_first.as_slice());
        assert!(goals.contains(keep.id()));
    }

    #[test]
    fn mutations_survive_rebinding() {
        let store = Store::new(MemoryStorage::new());
        let id = {
            let mut goals = goals(&store);
            goals.append(trip()).id().clone()
        };

        let goals = goals(&store);
        assert_eq!(goals.len(), 1);
        assert!(goals.contains(&id));
    }

    #[test]
    fn binding_keeps_readable_records_next_to_an_unreadable_one() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                "pitiqq_goals",
                r#"[{"id":"g1","name":"Trip","target":null},{"id":"g2","contributions":"oops"}]"#,
            )
            .unwrap();
        let store = Store::new(storage);

        let mut goals = goals(&store);
        assert_eq!(goals.len(), 1);
        assert_eq!(goals.find(&RecordId::from("g1")).unwrap().target, 0.0);

        goals.append(trip());
        let stored: serde_json::Value = store.read("goals", json!(null));
        assert_eq!(stored.as_array().map(Vec::len), Some(2));
        assert_eq!(
            store.read("goals_unreadable", json!(null)),
            json!([{"id": "g2", "contributions": "oops"}])
        );
    }
}
