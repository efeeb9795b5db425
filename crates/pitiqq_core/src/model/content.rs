//! Short-video content pipeline records.
//!
//! # Responsibility
//! - Define ideas with their script and checklist sub-entities.
//! - Encode the production pipeline as an explicit state table.
//!
//! # Invariants
//! - `IdeaState::Idea` has no predecessor; `IdeaState::Published` has no
//!   successor. Every other state has exactly one of each.

use super::priority::Priority;
use super::record::{
    impl_record, lenient_date, lenient_timestamp, lenient_u64, RecordId,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

wire_enum! {
    /// Production pipeline state.
    pub enum IdeaState {
        Idea => "idea",
        InProduction => "en_produccion",
        Recorded => "grabado",
        Edited => "editado",
        Published => "publicado",
    }
    default = Idea;
}

/// Allowed neighbours of one pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub previous: Option<IdeaState>,
    pub next: Option<IdeaState>,
}

impl IdeaState {
    /// Transition table entry for this state.
    pub fn transition(self) -> Transition {
        let (previous, next) = match self {
            IdeaState::Idea => (None, Some(IdeaState::InProduction)),
            IdeaState::InProduction => (Some(IdeaState::Idea), Some(IdeaState::Recorded)),
            IdeaState::Recorded => (Some(IdeaState::InProduction), Some(IdeaState::Edited)),
            IdeaState::Edited => (Some(IdeaState::Recorded), Some(IdeaState::Published)),
            IdeaState::Published => (Some(IdeaState::Edited), None),
        };
        Transition { previous, next }
    }

    pub fn next(self) -> Option<Self> {
        self.transition().next
    }

    pub fn previous(self) -> Option<Self> {
        self.transition().previous
    }

    pub fn is_initial(self) -> bool {
        self.previous().is_none()
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    pub fn label(self) -> &'static str {
        match self {
            IdeaState::Idea => "Idea",
            IdeaState::InProduction => "En producción",
            IdeaState::Recorded => "Grabado",
            IdeaState::Edited => "Editado",
            IdeaState::Published => "Publicado",
        }
    }
}

/// Four-part video script.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    pub hook: String,
    pub body: String,
    pub close: String,
    pub cta: String,
}

impl Script {
    pub fn is_empty(&self) -> bool {
        [&self.hook, &self.body, &self.close, &self.cta]
            .iter()
            .all(|part| part.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecklistItem {
    pub text: String,
    pub done: bool,
}

/// A content idea moving through the production pipeline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Idea {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub state: IdeaState,
    pub category: String,
    pub priority: Priority,
    #[serde(
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub publish_date: Option<NaiveDate>,
    pub script: Script,
    pub checklist: Vec<ChecklistItem>,
    #[serde(
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Idea {
    pub fn new(title: impl Into<String>, category: impl Into<String>, priority: Priority) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            priority,
            ..Self::default()
        }
    }

    /// Moves to the next pipeline state; `false` at the terminal state.
    pub fn advance(&mut self) -> bool {
        match self.state.next() {
            Some(next) => {
                self.state = next;
                true
            }
            None => false,
        }
    }

    /// Moves to the previous pipeline state; `false` at the initial state.
    pub fn retreat(&mut self) -> bool {
        match self.state.previous() {
            Some(previous) => {
                self.state = previous;
                true
            }
            None => false,
        }
    }

    /// Appends a trimmed checklist entry; blank text is ignored.
    pub fn add_checklist_item(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.checklist.push(ChecklistItem {
            text: text.to_string(),
            done: false,
        });
        true
    }

    /// Flips `done` of the entry at `index`; out-of-range is a no-op.
    pub fn toggle_checklist_item(&mut self, index: usize) -> bool {
        match self.checklist.get_mut(index) {
            Some(item) => {
                item.done = !item.done;
                true
            }
            None => false,
        }
    }

    pub fn remove_checklist_item(&mut self, index: usize) -> bool {
        if index >= self.checklist.len() {
            return false;
        }
        self.checklist.remove(index);
        true
    }
}

/// A trending sound/format to reuse before it expires.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Trend {
    pub id: RecordId,
    pub name: String,
    pub link: String,
    #[serde(
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<NaiveDate>,
    pub used: bool,
}

/// Performance numbers for one published video.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoStat {
    pub id: RecordId,
    pub title: String,
    pub category: String,
    #[serde(deserialize_with = "lenient_u64")]
    pub views: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub likes: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub comments: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub shares: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub saves: u64,
    pub date: String,
}

/// Reusable hashtag set for one content category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HashtagGroup {
    pub id: RecordId,
    pub category: String,
    pub tags: Vec<String>,
}

impl_record!(Idea, Trend, VideoStat, HashtagGroup);
