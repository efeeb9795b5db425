//! Persisted store: bindings between in-memory values and durable slots.
//!
//! # Responsibility
//! - Map logical slot names onto prefixed storage keys.
//! - Keep each bound value and its slot in sync (write-through).
//! - Provide typed CRUD over sequence-valued slots.
//!
//! # Invariants
//! - At most one live binding per key within a `Store`.
//! - Storage failures never propagate past this module.
//! - Reads fall back to the declared default on missing or malformed data.

mod collection;
mod persisted;

pub use collection::{Collection, CollectionError, CollectionResult};
pub use persisted::{Persisted, Store, StoreConfig, StoreError, StoreResult};
