//! Planning view-models: objective progress, personal task lists and the
//! wedding planner summary.

use super::{clamped_percentage, compare_scheduled, sort_scheduled};
use crate::model::planning::{Guest, GuestStatus, KeyResult, Okr, Task, UserId, WeddingTask};
use chrono::NaiveDate;

/// Key result completion in `0.0..=100.0`; `0` when the target is not positive.
pub fn key_result_percentage(key_result: &KeyResult) -> f64 {
    clamped_percentage(key_result.current, key_result.target)
}

/// Unweighted mean of key result percentages, rounded; `0` without key results.
pub fn okr_progress(okr: &Okr) -> u32 {
    if okr.key_results.is_empty() {
        return 0;
    }
    let total: f64 = okr.key_results.iter().map(key_result_percentage).sum();
    (total / okr.key_results.len() as f64).round() as u32
}

/// Progress band used to color objective and key result bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressBand {
    /// Below 70%.
    Behind,
    /// 70% up to 99%.
    OnTrack,
    Done,
}

pub fn progress_band(percentage: u32) -> ProgressBand {
    match percentage {
        100.. => ProgressBand::Done,
        70..=99 => ProgressBand::OnTrack,
        _ => ProgressBand::Behind,
    }
}

/// Pending tasks of `owner`, optionally of one category, in priority and
/// due-date order.
pub fn pending_tasks<'a>(tasks: &'a [Task], owner: &UserId, category: Option<&str>) -> Vec<&'a Task> {
    sort_scheduled(
        tasks
            .iter()
            .filter(|task| &task.owner == owner && !task.done)
            .filter(|task| category.map_or(true, |wanted| task.category == wanted))
            .collect(),
    )
}

/// Completed tasks of `owner`, most recently completed first; tasks
/// without a completion stamp go last.
pub fn completed_tasks<'a>(tasks: &'a [Task], owner: &UserId) -> Vec<&'a Task> {
    let mut done: Vec<&Task> = tasks
        .iter()
        .filter(|task| &task.owner == owner && task.done)
        .collect();
    done.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    done
}

/// A task is overdue once its deadline day has passed.
pub fn is_overdue(deadline: Option<NaiveDate>, today: NaiveDate) -> bool {
    deadline.is_some_and(|deadline| deadline < today)
}

/// Head counts (guests plus companions) per RSVP state, saturating at
/// `u32::MAX`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuestSummary {
    pub total: u32,
    pub confirmed: u32,
    pub pending: u32,
    pub declined: u32,
}

pub fn guest_summary(guests: &[Guest]) -> GuestSummary {
    guests.iter().fold(GuestSummary::default(), |mut summary, guest| {
        let heads = guest.head_count();
        summary.total = summary.total.saturating_add(heads);
        let bucket = match guest.status {
            GuestStatus::Confirmed => &mut summary.confirmed,
            GuestStatus::Pending => &mut summary.pending,
            GuestStatus::Declined => &mut summary.declined,
        };
        *bucket = bucket.saturating_add(heads);
        summary
    })
}

pub fn filter_guests(guests: &[Guest], status: Option<GuestStatus>) -> Vec<&Guest> {
    guests
        .iter()
        .filter(|guest| status.map_or(true, |wanted| guest.status == wanted))
        .collect()
}

/// Pending tasks first, then by priority and due date.
pub fn sorted_wedding_tasks(tasks: &[WeddingTask]) -> Vec<&WeddingTask> {
    let mut sorted: Vec<&WeddingTask> = tasks.iter().collect();
    sorted.sort_by(|a, b| a.done.cmp(&b.done).then_with(|| compare_scheduled(*a, *b)));
    sorted
}

/// `(done, total)` of the wedding checklist.
pub fn wedding_task_counts(tasks: &[WeddingTask]) -> (usize, usize) {
    (tasks.iter().filter(|task| task.done).count(), tasks.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::priority::Priority;
    use chrono::{TimeZone, Utc};

    fn key_result(current: f64, target: f64) -> KeyResult {
        KeyResult {
            current,
            target,
            ..KeyResult::default()
        }
    }

    #[test]
    fn okr_progress_is_unweighted_mean() {
        let mut okr = Okr::new("Grow", "Q1");
        assert_eq!(okr_progress(&okr), 0);

        okr.key_results = vec![key_result(5.0, 10.0), key_result(20_000.0, 10_000.0)];
        assert_eq!(okr_progress(&okr), 75);

        okr.key_results.push(key_result(3.0, 0.0));
        assert_eq!(okr_progress(&okr), 50);
        assert_eq!(progress_band(75), ProgressBand::OnTrack);
        assert_eq!(progress_band(100), ProgressBand::Done);
        assert_eq!(progress_band(12), ProgressBand::Behind);
    }

    #[test]
    fn task_lists_are_scoped_to_owner() {
        let mateo = UserId::new("mateo");
        let lucre = UserId::new("lucre");
        let tasks = vec![
            Task {
                priority: Priority::Low,
                ..Task::new(mateo.clone(), "low", "casa")
            },
            Task {
                priority: Priority::High,
                ..Task::new(lucre.clone(), "other owner", "casa")
            },
            Task {
                priority: Priority::High,
                ..Task::new(mateo.clone(), "high", "trabajo")
            },
            Task {
                done: true,
                completed_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
                ..Task::new(mateo.clone(), "old", "casa")
            },
            Task {
                done: true,
                completed_at: Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
                ..Task::new(mateo.clone(), "new", "casa")
            },
        ];

        let pending: Vec<_> = pending_tasks(&tasks, &mateo, None)
            .into_iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(pending, vec!["high", "low"]);
        assert_eq!(pending_tasks(&tasks, &mateo, Some("casa")).len(), 1);

        let done: Vec<_> = completed_tasks(&tasks, &mateo)
            .into_iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(done, vec!["new", "old"]);
    }

    #[test]
    fn overdue_only_after_deadline_day() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert!(is_overdue(NaiveDate::from_ymd_opt(2024, 3, 9), today));
        assert!(!is_overdue(Some(today), today));
        assert!(!is_overdue(None, today));
    }

    #[test]
    fn guest_summary_counts_companions() {
        let guests = vec![
            Guest {
                companions: 2,
                status: GuestStatus::Confirmed,
                ..Guest::default()
            },
            Guest {
                companions: 0,
                ..Guest::default()
            },
            Guest {
                companions: 1,
                status: GuestStatus::Declined,
                ..Guest::default()
            },
        ];
        assert_eq!(
            guest_summary(&guests),
            GuestSummary {
                total: 6,
                confirmed: 3,
                pending: 1,
                declined: 2
            }
        );
        assert_eq!(filter_guests(&guests, Some(GuestStatus::Pending)).len(), 1);
    }

    #[test]
    fn guest_summary_saturates_on_huge_companion_counts() {
        let guest = Guest {
            companions: u32::MAX,
            status: GuestStatus::Confirmed,
            ..Guest::default()
        };
        assert_eq!(guest.head_count(), u32::MAX);

        let summary = guest_summary(&[guest.clone(), guest]);
        assert_eq!(summary.total, u32::MAX);
        assert_eq!(summary.confirmed, u32::MAX);
        assert_eq!(summary.pending, 0);
    }

    #[test]
    fn wedding_tasks_put_pending_first() {
        let tasks = vec![
            WeddingTask {
                title: "done-high".to_string(),
                priority: Priority::High,
                done: true,
                ..WeddingTask::default()
            },
            WeddingTask {
                title: "low".to_string(),
                priority: Priority::Low,
                ..WeddingTask::default()
            },
            WeddingTask {
                title: "high".to_string(),
                priority: Priority::High,
                ..WeddingTask::default()
            },
        ];
        let titles: Vec<_> = sorted_wedding_tasks(&tasks)
            .into_iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, vec!["high", "low", "done-high"]);
        assert_eq!(wedding_task_counts(&tasks), (1, 3));
    }
}
