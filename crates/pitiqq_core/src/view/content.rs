//! Content pipeline view-models: Kanban board, publishing calendar,
//! checklist progress, video statistics, trends and hashtags.

use super::{rounded_percentage, sort_scheduled};
use crate::model::catalog::{Category, CONTENT_CATEGORIES};
use crate::model::content::{HashtagGroup, Idea, IdeaState, Trend, VideoStat};
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static HASHTAG_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s,]+").expect("valid hashtag separator regex"));

const CHART_LABEL_CHARS: usize = 12;

/// One Kanban column.
#[derive(Debug, Clone, PartialEq)]
pub struct KanbanColumn<'a> {
    pub state: IdeaState,
    pub ideas: Vec<&'a Idea>,
}

/// One column per pipeline state, in pipeline order; ideas keep
/// collection order inside a column.
pub fn kanban_columns(ideas: &[Idea]) -> Vec<KanbanColumn<'_>> {
    IdeaState::ALL
        .iter()
        .map(|state| KanbanColumn {
            state: *state,
            ideas: ideas.iter().filter(|idea| idea.state == *state).collect(),
        })
        .collect()
}

/// Ideas (optionally of one state) by priority then publish date.
pub fn prioritized_ideas(ideas: &[Idea], state: Option<IdeaState>) -> Vec<&Idea> {
    sort_scheduled(
        ideas
            .iter()
            .filter(|idea| state.map_or(true, |wanted| idea.state == wanted))
            .collect(),
    )
}

/// Number of ideas per state, in pipeline order.
pub fn state_counts(ideas: &[Idea]) -> Vec<(IdeaState, usize)> {
    kanban_columns(ideas)
        .into_iter()
        .map(|column| (column.state, column.ideas.len()))
        .collect()
}

/// Ideas with a publish date, grouped by that date.
pub fn ideas_by_publish_date(ideas: &[Idea]) -> BTreeMap<NaiveDate, Vec<&Idea>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<&Idea>> = BTreeMap::new();
    for idea in ideas {
        if let Some(date) = idea.publish_date {
            grouped.entry(date).or_default().push(idea);
        }
    }
    grouped
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    pub ideas: Vec<&'a Idea>,
}

/// Monday-first month grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarMonth<'a> {
    pub year: i32,
    pub month: u32,
    /// Empty cells before day 1 (0 when the month starts on Monday).
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay<'a>>,
}

/// Builds the publishing calendar; `None` for an invalid year/month.
pub fn calendar_month(ideas: &[Idea], year: i32, month: u32) -> Option<CalendarMonth<'_>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let by_date = ideas_by_publish_date(ideas);
    let days = first
        .iter_days()
        .take_while(|date| date.month() == month)
        .map(|date| CalendarDay {
            date,
            ideas: by_date.get(&date).cloned().unwrap_or_default(),
        })
        .collect();

    Some(CalendarMonth {
        year,
        month,
        leading_blanks: first.weekday().num_days_from_monday(),
        days,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistProgress {
    pub done: usize,
    pub total: usize,
    pub percentage: u32,
}

pub fn checklist_progress(idea: &Idea) -> ChecklistProgress {
    let total = idea.checklist.len();
    let done = idea.checklist.iter().filter(|item| item.done).count();
    ChecklistProgress {
        done,
        total,
        percentage: rounded_percentage(done as f64, total as f64),
    }
}

/// Sums of every engagement counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VideoTotals {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub saves: u64,
}

/// Sums saturate at `u64::MAX`.
pub fn video_totals(stats: &[VideoStat]) -> VideoTotals {
    stats.iter().fold(VideoTotals::default(), |acc, stat| VideoTotals {
        views: acc.views.saturating_add(stat.views),
        likes: acc.likes.saturating_add(stat.likes),
        comments: acc.comments.saturating_add(stat.comments),
        shares: acc.shares.saturating_add(stat.shares),
        saves: acc.saves.saturating_add(stat.saves),
    })
}

/// Category with the highest average views.
///
/// Ties keep the category seen first; `None` when no category averages
/// above zero.
pub fn best_category(stats: &[VideoStat]) -> Option<&'static Category> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for stat in stats {
        let entry = totals.entry(stat.category.as_str()).or_insert_with(|| {
            order.push(stat.category.as_str());
            (0, 0)
        });
        entry.0 = entry.0.saturating_add(stat.views);
        entry.1 += 1;
    }

    let mut best: Option<(&str, f64)> = None;
    for category in order {
        let (views, count) = totals[category];
        let average = views as f64 / count as f64;
        if average > best.map_or(0.0, |(_, top)| top) {
            best = Some((category, average));
        }
    }
    best.map(|(category, _)| CONTENT_CATEGORIES.resolve(category))
}

/// One bar of the recent-videos chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPoint {
    pub label: String,
    pub views: u64,
    pub likes: u64,
}

/// The last `limit` videos in collection order.
pub fn recent_chart(stats: &[VideoStat], limit: usize) -> Vec<ChartPoint> {
    let start = stats.len().saturating_sub(limit);
    stats[start..]
        .iter()
        .map(|stat| ChartPoint {
            label: chart_label(&stat.title),
            views: stat.views,
            likes: stat.likes,
        })
        .collect()
}

/// Title shortened to 12 characters plus an ellipsis marker.
pub fn chart_label(title: &str) -> String {
    let mut label: String = title.chars().take(CHART_LABEL_CHARS).collect();
    if title.chars().count() > CHART_LABEL_CHARS {
        label.push_str("...");
    }
    label
}

/// Compact counter (`1.2K`, `3.4M`).
pub fn compact_count(value: u64) -> String {
    if value >= 1_000_000 {
        format!("{:.1}M", value as f64 / 1_000_000.0)
    } else if value >= 1_000 {
        format!("{:.1}K", value as f64 / 1_000.0)
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrendFilter {
    #[default]
    All,
    Pending,
    Used,
}

pub fn filter_trends(trends: &[Trend], filter: TrendFilter) -> Vec<&Trend> {
    trends
        .iter()
        .filter(|trend| match filter {
            TrendFilter::All => true,
            TrendFilter::Pending => !trend.used,
            TrendFilter::Used => trend.used,
        })
        .collect()
}

/// A trend expires once its deadline day has passed.
pub fn is_expired(deadline: Option<NaiveDate>, today: NaiveDate) -> bool {
    deadline.is_some_and(|deadline| deadline < today)
}

/// Splits free text on whitespace/commas into `#`-prefixed tags.
pub fn parse_hashtags(input: &str) -> Vec<String> {
    HASHTAG_SEPARATOR_RE
        .split(input)
        .filter(|tag| !tag.is_empty())
        .map(|tag| {
            if tag.starts_with('#') {
                tag.to_string()
            } else {
                format!("#{tag}")
            }
        })
        .collect()
}

pub fn filter_hashtag_groups<'a>(
    groups: &'a [HashtagGroup],
    category: Option<&str>,
) -> Vec<&'a HashtagGroup> {
    groups
        .iter()
        .filter(|group| category.map_or(true, |wanted| group.category == wanted))
        .collect()
}

/// Space-joined tags, ready to paste into a caption.
pub fn hashtag_line(group: &HashtagGroup) -> String {
    group.tags.join(" ")
}
