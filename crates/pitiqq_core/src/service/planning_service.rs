//! Planning use-case service: personal tasks, OKRs and the wedding planner.
//!
//! # Invariants
//! - Every task carries an explicit owner; per-profile views filter on it.
//! - Key-result progress is never negative.

use crate::model::planning::{Guest, GuestStatus, KeyResult, Okr, Task, UserId, WeddingTask};
use crate::model::record::RecordId;
use crate::service::workspace::{Clock, Workspace};
use crate::service::{require_positive, require_text, ServiceResult};
use log::info;

/// Use-case wrapper for tasks, objectives and wedding planning.
pub struct PlanningService<'w> {
    workspace: &'w mut Workspace,
}

impl<'w> PlanningService<'w> {
    pub fn new(workspace: &'w mut Workspace) -> Self {
        Self { workspace }
    }

    /// Stores a pending task owned by `owner`.
    ///
    /// # Contract
    /// - The `owner` argument overrides whatever the request carried.
    /// - `done` and `completed_at` start cleared; `created_at` is stamped.
    pub fn create_task(&mut self, owner: &UserId, mut task: Task) -> ServiceResult<Task> {
        require_text("title", &task.title)?;
        task.owner = owner.clone();
        task.title = task.title.trim().to_string();
        task.done = false;
        task.completed_at = None;
        task.created_at = Some(self.workspace.clock().now());
        let task = self.workspace.tasks.append(task);
        info!(
            "event=task_create module=service status=ok owner={} id={}",
            task.owner, task.id
        );
        Ok(task)
    }

    /// Flips completion. Returns the new `done` value, `None` when missing.
    pub fn toggle_task(&mut self, id: &RecordId) -> Option<bool> {
        let at = self.workspace.clock().now();
        let mut done = None;
        self.workspace.tasks.modify(id, |task| {
            task.toggle(at);
            done = Some(task.done);
        });
        done
    }

    pub fn delete_task(&mut self, id: &RecordId) -> bool {
        self.workspace.tasks.remove(id)
    }

    pub fn create_okr(
        &mut self,
        title: &str,
        period: &str,
        description: &str,
    ) -> ServiceResult<Okr> {
        require_text("title", title)?;
        let mut okr = Okr::new(title.trim(), period);
        okr.description = description.to_string();
        okr.created_at = Some(self.workspace.clock().now());
        let okr = self.workspace.okrs.append(okr);
        info!("event=okr_create module=service status=ok id={}", okr.id);
        Ok(okr)
    }

    pub fn delete_okr(&mut self, id: &RecordId) -> bool {
        self.workspace.okrs.remove(id)
    }

    /// Adds or replaces a key result inside an objective.
    ///
    /// # Contract
    /// - Description must be non-empty and target positive.
    /// - Returns the key result id, or `None` when the objective is missing.
    pub fn upsert_key_result(
        &mut self,
        okr_id: &RecordId,
        mut key_result: KeyResult,
    ) -> ServiceResult<Option<RecordId>> {
        require_text("description", &key_result.description)?;
        require_positive("target", key_result.target)?;
        key_result.current = key_result.current.max(0.0);
        let mut stored = None;
        self.workspace
            .okrs
            .modify(okr_id, |okr| stored = Some(okr.upsert_key_result(key_result)));
        Ok(stored)
    }

    /// Sets key-result progress, floored at zero.
    pub fn update_key_result_progress(
        &mut self,
        okr_id: &RecordId,
        key_result_id: &RecordId,
        current: f64,
    ) -> bool {
        let current = if current.is_finite() { current } else { 0.0 };
        let mut updated = false;
        self.workspace.okrs.modify(okr_id, |okr| {
            updated = okr.set_key_result_progress(key_result_id, current);
        });
        updated
    }

    pub fn remove_key_result(&mut self, okr_id: &RecordId, key_result_id: &RecordId) -> bool {
        let mut removed = false;
        self.workspace
            .okrs
            .modify(okr_id, |okr| removed = okr.remove_key_result(key_result_id));
        removed
    }

    pub fn add_wedding_task(&mut self, mut task: WeddingTask) -> ServiceResult<WeddingTask> {
        require_text("title", &task.title)?;
        task.done = false;
        Ok(self.workspace.wedding_tasks.append(task))
    }

    pub fn toggle_wedding_task(&mut self, id: &RecordId) -> Option<bool> {
        let mut done = None;
        self.workspace.wedding_tasks.modify(id, |task| {
            task.done = !task.done;
            done = Some(task.done);
        });
        done
    }

    pub fn delete_wedding_task(&mut self, id: &RecordId) -> bool {
        self.workspace.wedding_tasks.remove(id)
    }

    pub fn add_guest(&mut self, mut guest: Guest) -> ServiceResult<Guest> {
        require_text("name", &guest.name)?;
        guest.name = guest.name.trim().to_string();
        Ok(self.workspace.wedding_guests.append(guest))
    }

    pub fn change_guest_status(&mut self, id: &RecordId, status: GuestStatus) -> bool {
        self.workspace
            .wedding_guests
            .modify(id, |guest| guest.status = status)
    }

    pub fn delete_guest(&mut self, id: &RecordId) -> bool {
        self.workspace.wedding_guests.remove(id)
    }
}
