//! Store handle and single-slot bindings.

use crate::storage::StorageBackend;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Slot prefix used by the application when none is configured.
pub const DEFAULT_KEY_PREFIX: &str = "pitiqq_";

/// Appended to a slot name to form the slot holding values of that slot
/// which failed to decode.
pub const UNREADABLE_SUFFIX: &str = "_unreadable";

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A live binding already owns this slot.
    #[error("slot `{0}` is already bound")]
    AlreadyBound(String),
}

/// Naming options for durable slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Prepended to every logical slot name.
    pub key_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

struct StoreInner {
    backend: Box<dyn StorageBackend>,
    config: StoreConfig,
    bound: RefCell<HashSet<String>>,
}

/// Process-local handle over one storage medium.
///
/// Cloning is cheap and yields another handle to the same medium and the
/// same binding registry. Not `Send`: the store assumes a single writer.
#[derive(Clone)]
pub struct Store {
    inner: Rc<StoreInner>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("key_prefix", &self.inner.config.key_prefix)
            .field("bound", &self.inner.bound.borrow().len())
            .finish()
    }
}

impl Store {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self::with_config(backend, StoreConfig::default())
    }

    pub fn with_config(backend: impl StorageBackend + 'static, config: StoreConfig) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                backend: Box::new(backend),
                config,
                bound: RefCell::new(HashSet::new()),
            }),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Full storage key for a logical slot name.
    pub fn storage_key(&self, name: &str) -> String {
        format!("{}{name}", self.inner.config.key_prefix)
    }

    /// Reads a slot, returning `default` when it is absent, unreadable or
    /// not valid JSON for `T`.
    ///
    /// A stored value that fails to decode is copied to the
    /// `<name>_unreadable` slot first, so a later write-through of `default`
    /// does not destroy it.
    pub fn read<T: DeserializeOwned>(&self, name: &str, default: T) -> T {
        let Some(raw) = self.read_raw(name) else {
            return default;
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=store_read module=store status=fallback key={} reason=malformed error={err}",
                    self.storage_key(name)
                );
                let preserved: Value =
                    serde_json::from_str(&raw).unwrap_or_else(|_| Value::String(raw.clone()));
                self.set_aside(name, vec![preserved]);
                default
            }
        }
    }

    /// Reads a list slot element by element.
    ///
    /// Elements that do not decode as `T` are dropped from the result and
    /// copied to `<name>_unreadable`; the readable ones are kept in order.
    pub fn read_items<T: DeserializeOwned>(&self, name: &str) -> Vec<T> {
        let Some(raw) = self.read_raw(name) else {
            return Vec::new();
        };
        let elements = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(elements)) => elements,
            Ok(other) => {
                self.set_aside(name, vec![other]);
                return Vec::new();
            }
            Err(_) => {
                self.set_aside(name, vec![Value::String(raw)]);
                return Vec::new();
            }
        };

        let mut items = Vec::with_capacity(elements.len());
        let mut unreadable = Vec::new();
        for element in elements {
            match T::deserialize(&element) {
                Ok(item) => items.push(item),
                Err(err) => {
                    warn!(
                        "event=store_read module=store status=fallback key={} reason=malformed_item error={err}",
                        self.storage_key(name)
                    );
                    unreadable.push(element);
                }
            }
        }
        if !unreadable.is_empty() {
            self.set_aside(name, unreadable);
        }
        items
    }

    fn read_raw(&self, name: &str) -> Option<String> {
        let key = self.storage_key(name);
        match self.inner.backend.get_item(&key) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("event=store_read module=store status=fallback key={key} reason=storage error={err}");
                None
            }
        }
    }

    /// Appends values to `<name>_unreadable`, skipping ones already kept.
    fn set_aside(&self, name: &str, values: Vec<Value>) {
        let slot = format!("{name}{UNREADABLE_SUFFIX}");
        let mut kept: Vec<Value> = self
            .read_raw(&slot)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        let before = kept.len();
        for value in values {
            if !kept.contains(&value) {
                kept.push(value);
            }
        }
        if kept.len() > before && self.write(&slot, &kept) {
            warn!(
                "event=store_set_aside module=store status=ok key={} count={}",
                self.storage_key(&slot),
                kept.len() - before
            );
        }
    }

    /// Serializes and writes a slot.
    ///
    /// Returns whether the medium accepted the write. Failures are logged
    /// and otherwise ignored; callers keep their in-memory value.
    pub fn write<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> bool {
        let key = self.storage_key(name);
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(err) => {
                warn!("event=store_write module=store status=error key={key} error_code=serialize_failed error={err}");
                return false;
            }
        };

        match self.inner.backend.set_item(&key, &json) {
            Ok(()) => {
                debug!("event=store_write module=store status=ok key={key} bytes={}", json.len());
                true
            }
            Err(err) => {
                warn!("event=store_write module=store status=error key={key} error_code=write_rejected error={err}");
                false
            }
        }
    }

    /// Deletes a slot; failures are logged and ignored.
    pub fn remove(&self, name: &str) {
        let key = self.storage_key(name);
        if let Err(err) = self.inner.backend.remove_item(&key) {
            warn!("event=store_remove module=store status=error key={key} error={err}");
        }
    }

    /// Logical slot names currently present under this store's prefix.
    pub fn slot_names(&self) -> Vec<String> {
        let prefix = &self.inner.config.key_prefix;
        match self.inner.backend.keys() {
            Ok(keys) => keys
                .into_iter()
                .filter_map(|key| key.strip_prefix(prefix.as_str()).map(str::to_string))
                .collect(),
            Err(err) => {
                warn!("event=store_keys module=store status=error error={err}");
                Vec::new()
            }
        }
    }

    /// Creates the binding for `name`, initialized from storage.
    ///
    /// # Errors
    /// - `StoreError::AlreadyBound` while another binding for `name` is alive.
    pub fn bind<T>(&self, name: &str, default: T) -> StoreResult<Persisted<T>>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        let fallback = default.clone();
        self.bind_with(name, default, |store| store.read(name, fallback))
    }

    /// Like [`Store::bind`], with the initial value produced by `load`.
    pub(crate) fn bind_with<T>(
        &self,
        name: &str,
        default: T,
        load: impl FnOnce(&Store) -> T,
    ) -> StoreResult<Persisted<T>>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        if !self.inner.bound.borrow_mut().insert(name.to_string()) {
            return Err(StoreError::AlreadyBound(name.to_string()));
        }
        let value = load(self);
        Ok(Persisted {
            store: self.clone(),
            name: name.to_string(),
            default,
            value,
        })
    }

    /// Whether a live binding exists for `name`.
    pub fn is_bound(&self, name: &str) -> bool {
        self.inner.bound.borrow().contains(name)
    }

    fn release(&self, name: &str) {
        self.inner.bound.borrow_mut().remove(name);
    }
}

/// A named slot bound to an in-memory value.
///
/// Every mutation re-serializes and writes the whole value before returning.
pub struct Persisted<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    store: Store,
    name: String,
    default: T,
    value: T,
}

impl<T> Persisted<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Replaces the value and writes it through.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.flush();
    }

    /// Mutates the value in place and writes it through.
    pub fn update<R>(&mut self, apply: impl FnOnce(&mut T) -> R) -> R {
        let result = apply(&mut self.value);
        self.flush();
        result
    }

    /// Resets to the declared default and writes it through.
    pub fn reset(&mut self) {
        self.set(self.default.clone());
    }

    /// Re-reads the slot from storage, discarding the in-memory value.
    pub fn reload(&mut self) {
        self.value = self.store.read(&self.name, self.default.clone());
    }

    /// Replaces the in-memory value with `load(store, name)` without writing.
    pub(crate) fn reload_with(&mut self, load: impl FnOnce(&Store, &str) -> T) {
        self.value = load(&self.store, &self.name);
    }

    /// Writes the current value; returns whether the medium accepted it.
    pub fn flush(&self) -> bool {
        self.store.write(&self.name, &self.value)
    }
}

impl<T> fmt::Debug for Persisted<T>
where
    T: Serialize + DeserializeOwned + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persisted")
            .field("name", &self.name)
            .field("value", &self.value)
            .finish()
    }
}

impl<T> Drop for Persisted<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    fn drop(&mut self) {
        self.store.release(&self.name);
    }
}
