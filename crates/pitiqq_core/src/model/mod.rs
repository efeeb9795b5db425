//! Typed domain records persisted in collections.
//!
//! # Responsibility
//! - Define one explicit record type per domain entity.
//! - Centralize default-filling in deserialization so reads stay total.
//!
//! # Invariants
//! - Every top-level record carries a stable `RecordId`.
//! - Wire names are camelCase; enum ids keep the stored application ids.
//! - Missing fields deserialize to defaults; unknown enum ids fall back to
//!   each enum's documented default.

#[macro_use]
mod wire;

pub mod catalog;
pub mod content;
pub mod finance;
pub mod planning;
pub mod priority;
pub mod record;
