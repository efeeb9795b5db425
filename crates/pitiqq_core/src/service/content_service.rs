//! Content pipeline use-case service.
//!
//! # Responsibility
//! - Create ideas and move them through the production states.
//! - Maintain idea checklists, trends, video stats and hashtag groups.

use crate::model::content::{HashtagGroup, Idea, IdeaState, Script, Trend, VideoStat};
use crate::model::record::RecordId;
use crate::service::workspace::{Clock, Workspace};
use crate::service::{require_text, ServiceError, ServiceResult};
use crate::view::content::parse_hashtags;
use log::{debug, info};

/// Use-case wrapper for the content planner.
pub struct ContentService<'w> {
    workspace: &'w mut Workspace,
}

impl<'w> ContentService<'w> {
    pub fn new(workspace: &'w mut Workspace) -> Self {
        Self { workspace }
    }

    /// Stores a new idea in the initial state.
    ///
    /// # Contract
    /// - Title must be non-empty; it is stored trimmed.
    /// - `state` is reset to `IdeaState::Idea`; `created_at` is stamped.
    pub fn create_idea(&mut self, mut idea: Idea) -> ServiceResult<Idea> {
        require_text("title", &idea.title)?;
        idea.title = idea.title.trim().to_string();
        idea.state = IdeaState::default();
        idea.created_at = Some(self.workspace.clock().now());
        let idea = self.workspace.ideas.append(idea);
        info!("event=idea_create module=service status=ok id={}", idea.id);
        Ok(idea)
    }

    /// Replaces editable idea fields, keeping id, state and creation stamp.
    pub fn edit_idea(&mut self, id: &RecordId, edited: Idea) -> ServiceResult<bool> {
        require_text("title", &edited.title)?;
        Ok(self.workspace.ideas.modify(id, |idea| {
            idea.title = edited.title.trim().to_string();
            idea.description = edited.description;
            idea.category = edited.category;
            idea.priority = edited.priority;
            idea.publish_date = edited.publish_date;
            idea.script = edited.script;
            idea.checklist = edited.checklist;
        }))
    }

    pub fn delete_idea(&mut self, id: &RecordId) -> bool {
        self.workspace.ideas.remove(id)
    }

    /// Moves an idea one state forward. Returns the new state, or `None`
    /// when the idea is missing or already published.
    pub fn advance_idea(&mut self, id: &RecordId) -> Option<IdeaState> {
        self.step_idea(id, Idea::advance, "idea_advance")
    }

    /// Moves an idea one state back. Returns the new state, or `None` when
    /// the idea is missing or still in the initial state.
    pub fn retreat_idea(&mut self, id: &RecordId) -> Option<IdeaState> {
        self.step_idea(id, Idea::retreat, "idea_retreat")
    }

    fn step_idea(
        &mut self,
        id: &RecordId,
        step: fn(&mut Idea) -> bool,
        event: &str,
    ) -> Option<IdeaState> {
        let mut moved = None;
        self.workspace.ideas.modify(id, |idea| {
            if step(idea) {
                moved = Some(idea.state);
            }
        });
        match moved {
            Some(state) => info!("event={event} module=service status=ok id={id} state={state}"),
            None => debug!("event={event} module=service status=skip id={id}"),
        }
        moved
    }

    pub fn update_script(&mut self, id: &RecordId, script: Script) -> bool {
        self.workspace.ideas.modify(id, |idea| idea.script = script)
    }

    /// Adds a trimmed checklist entry; blank text is rejected.
    pub fn add_checklist_item(&mut self, id: &RecordId, text: &str) -> ServiceResult<bool> {
        require_text("text", text)?;
        let mut added = false;
        self.workspace
            .ideas
            .modify(id, |idea| added = idea.add_checklist_item(text));
        Ok(added)
    }

    pub fn toggle_checklist_item(&mut self, id: &RecordId, index: usize) -> bool {
        let mut toggled = false;
        self.workspace
            .ideas
            .modify(id, |idea| toggled = idea.toggle_checklist_item(index));
        toggled
    }

    pub fn remove_checklist_item(&mut self, id: &RecordId, index: usize) -> bool {
        let mut removed = false;
        self.workspace
            .ideas
            .modify(id, |idea| removed = idea.remove_checklist_item(index));
        removed
    }

    pub fn add_trend(&mut self, mut trend: Trend) -> ServiceResult<Trend> {
        require_text("name", &trend.name)?;
        trend.name = trend.name.trim().to_string();
        trend.used = false;
        Ok(self.workspace.trends.append(trend))
    }

    /// Flips the `used` flag. Returns the new value, `None` when missing.
    pub fn toggle_trend_used(&mut self, id: &RecordId) -> Option<bool> {
        let mut used = None;
        self.workspace.trends.modify(id, |trend| {
            trend.used = !trend.used;
            used = Some(trend.used);
        });
        used
    }

    pub fn delete_trend(&mut self, id: &RecordId) -> bool {
        self.workspace.trends.remove(id)
    }

    pub fn add_video_stat(&mut self, stat: VideoStat) -> ServiceResult<VideoStat> {
        require_text("title", &stat.title)?;
        Ok(self.workspace.video_stats.append(stat))
    }

    pub fn delete_video_stat(&mut self, id: &RecordId) -> bool {
        self.workspace.video_stats.remove(id)
    }

    /// Stores a hashtag group parsed from free text.
    ///
    /// # Contract
    /// - Tags split on whitespace and commas, each prefixed with `#`.
    /// - Input without any tag is rejected.
    pub fn add_hashtag_group(
        &mut self,
        category: &str,
        raw_tags: &str,
    ) -> ServiceResult<HashtagGroup> {
        require_text("category", category)?;
        let tags = parse_hashtags(raw_tags);
        if tags.is_empty() {
            return Err(ServiceError::EmptyField("tags"));
        }
        let group = self.workspace.hashtags.append(HashtagGroup {
            id: RecordId::default(),
            category: category.to_string(),
            tags,
        });
        info!(
            "event=hashtag_group_add module=service status=ok id={} tags={}",
            group.id,
            group.tags.len()
        );
        Ok(group)
    }

    pub fn delete_hashtag_group(&mut self, id: &RecordId) -> bool {
        self.workspace.hashtags.remove(id)
    }
}
