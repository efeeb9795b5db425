//! Derived view-models over collection snapshots.
//!
//! # Responsibility
//! - Compute aggregates, progress figures and display orderings.
//!
//! # Invariants
//! - Every function is pure over its inputs and total over well-formed
//!   records; nothing here reads or writes storage.
//! - Percentages never exceed 100 and never divide by zero.
//! - Sorts are stable: equal keys keep collection (insertion) order.

use crate::model::content::Idea;
use crate::model::planning::{Task, WeddingTask};
use crate::model::priority::Priority;
use chrono::NaiveDate;
use std::cmp::Ordering;

pub mod content;
pub mod finance;
pub mod planning;

/// `part / whole * 100`, clamped to `0..=100`; `0` when `whole <= 0`.
pub fn clamped_percentage(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 || !part.is_finite() || !whole.is_finite() {
        return 0.0;
    }
    (part / whole * 100.0).clamp(0.0, 100.0)
}

/// Rounded `clamped_percentage`.
pub fn rounded_percentage(part: f64, whole: f64) -> u32 {
    clamped_percentage(part, whole).round() as u32
}

/// Items ordered by priority and due date.
pub trait Scheduled {
    fn priority(&self) -> Priority;
    fn due_date(&self) -> Option<NaiveDate>;
}

impl Scheduled for Task {
    fn priority(&self) -> Priority {
        self.priority
    }

    fn due_date(&self) -> Option<NaiveDate> {
        self.deadline
    }
}

impl Scheduled for WeddingTask {
    fn priority(&self) -> Priority {
        self.priority
    }

    fn due_date(&self) -> Option<NaiveDate> {
        self.deadline
    }
}

impl Scheduled for Idea {
    fn priority(&self) -> Priority {
        self.priority
    }

    fn due_date(&self) -> Option<NaiveDate> {
        self.publish_date
    }
}

/// Priority rank first (high before low), then nearest due date; undated
/// items sort after dated ones of the same priority.
pub fn compare_scheduled<T: Scheduled>(a: &T, b: &T) -> Ordering {
    a.priority()
        .rank()
        .cmp(&b.priority().rank())
        .then_with(|| match (a.due_date(), b.due_date()) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

/// Stable sort of borrowed items by `compare_scheduled`.
pub fn sort_scheduled<'a, T: Scheduled>(mut items: Vec<&'a T>) -> Vec<&'a T> {
    items.sort_by(|a, b| compare_scheduled(*a, *b));
    items
}

#[cfg(test)]
mod tests {
    use super::{clamped_percentage, rounded_percentage, sort_scheduled};
    use crate::model::planning::Task;
    use crate::model::priority::Priority;
    use chrono::NaiveDate;

    fn task(title: &str, priority: Priority, deadline: Option<&str>) -> Task {
        Task {
            title: title.to_string(),
            priority,
            deadline: deadline.map(|value| NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()),
            ..Task::default()
        }
    }

    #[test]
    fn percentages_clamp_and_handle_zero_denominators() {
        assert_eq!(clamped_percentage(5000.0, 1000.0), 100.0);
        assert_eq!(clamped_percentage(10.0, 0.0), 0.0);
        assert_eq!(rounded_percentage(1.0, 3.0), 33);
    }

    #[test]
    fn sort_orders_by_priority_then_deadline_with_undated_last() {
        let tasks = vec![
            task("low", Priority::Low, Some("2024-01-01")),
            task("medium-undated", Priority::Medium, None),
            task("medium-late", Priority::Medium, Some("2024-03-01")),
            task("high", Priority::High, None),
            task("medium-early", Priority::Medium, Some("2024-02-01")),
            task("medium-undated-2", Priority::Medium, None),
        ];

        let titles: Vec<_> = sort_scheduled(tasks.iter().collect())
            .into_iter()
            .map(|task| task.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec![
                "high",
                "medium-early",
                "medium-late",
                "medium-undated",
                "medium-undated-2",
                "low"
            ]
        );
    }
}
