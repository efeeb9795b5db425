//! Planning records: objectives, personal tasks and the wedding planner.
//!
//! # Invariants
//! - Personal tasks live in one collection partitioned by `owner`.
//! - `completed_at` is set exactly when `done` is true.

use super::priority::Priority;
use super::record::{
    impl_record, lenient_date, lenient_f64, lenient_timestamp, lenient_u32, RecordId,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Measurable result under an objective.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyResult {
    pub id: RecordId,
    pub description: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub current: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub target: f64,
    pub unit: String,
}

/// Objective with its key results.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Okr {
    pub id: RecordId,
    pub title: String,
    pub period: String,
    pub description: String,
    pub key_results: Vec<KeyResult>,
    #[serde(
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Okr {
    pub fn new(title: impl Into<String>, period: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            period: period.into(),
            ..Self::default()
        }
    }

    /// Inserts `key_result` or replaces the one with the same id.
    ///
    /// A key result with an empty id receives a fresh one. Returns its id.
    pub fn upsert_key_result(&mut self, mut key_result: KeyResult) -> RecordId {
        if key_result.id.as_str().is_empty() {
            key_result.id = RecordId::generate();
        }
        let id = key_result.id.clone();
        match self.key_results.iter_mut().find(|kr| kr.id == id) {
            Some(existing) => *existing = key_result,
            None => self.key_results.push(key_result),
        }
        id
    }

    /// Sets progress of one key result, floored at zero.
    pub fn set_key_result_progress(&mut self, id: &RecordId, current: f64) -> bool {
        match self.key_results.iter_mut().find(|kr| &kr.id == id) {
            Some(key_result) => {
                key_result.current = current.max(0.0);
                true
            }
            None => false,
        }
    }

    pub fn remove_key_result(&mut self, id: &RecordId) -> bool {
        let before = self.key_results.len();
        self.key_results.retain(|kr| &kr.id != id);
        self.key_results.len() != before
    }
}

/// Identifier of a profile sharing the workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Personal to-do item owned by one profile.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    pub owner: UserId,
    pub title: String,
    pub category: String,
    pub priority: Priority,
    #[serde(
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<NaiveDate>,
    pub notes: String,
    pub done: bool,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(owner: UserId, title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            owner,
            title: title.into(),
            category: category.into(),
            ..Self::default()
        }
    }

    /// Flips completion, stamping or clearing `completed_at`.
    pub fn toggle(&mut self, at: DateTime<Utc>) {
        self.done = !self.done;
        self.completed_at = self.done.then_some(at);
    }
}

/// Checklist item of the wedding planner.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WeddingTask {
    pub id: RecordId,
    pub title: String,
    pub category: String,
    pub priority: Priority,
    #[serde(
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<NaiveDate>,
    pub done: bool,
}

wire_enum! {
    /// RSVP state of a guest.
    pub enum GuestStatus {
        Pending => "pendiente",
        Confirmed => "confirmado",
        Declined => "no_asiste",
    }
    default = Pending;
}

/// Invited party: one named guest plus companions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Guest {
    pub id: RecordId,
    pub name: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub companions: u32,
    pub status: GuestStatus,
    pub notes: String,
}

impl Guest {
    /// Head count of this party (guest plus companions).
    pub fn head_count(&self) -> u32 {
        self.companions.saturating_add(1)
    }
}

impl_record!(Okr, Task, WeddingTask, Guest);
