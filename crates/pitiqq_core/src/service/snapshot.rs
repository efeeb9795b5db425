//! Whole-workspace export and import.
//!
//! # Responsibility
//! - Serialize every collection and value slot into one JSON document.
//! - Restore a document, replacing the collections it carries.
//!
//! # Invariants
//! - Import is all-or-nothing: every present key is validated before any
//!   slot is written.
//! - Keys absent from (or `null` in) the document leave their slot as is.

use crate::model::content::{HashtagGroup, Idea, Trend, VideoStat};
use crate::model::finance::{Budget, DollarAccount, Goal, Movement};
use crate::model::planning::{Guest, Okr, Task, WeddingTask};
use crate::model::record::{lenient_f64, Record};
use crate::service::workspace::{Clock, Workspace};
use crate::store::Collection;
use chrono::{DateTime, NaiveDate, Utc};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const KEY_MOVEMENTS: &str = "movements";
pub const KEY_GOALS: &str = "goals";
pub const KEY_BUDGETS: &str = "budgets";
pub const KEY_IDEAS: &str = "ideas";
pub const KEY_TRENDS: &str = "trends";
pub const KEY_VIDEO_STATS: &str = "videoStats";
pub const KEY_HASHTAGS: &str = "hashtags";
pub const KEY_OKRS: &str = "okrs";
pub const KEY_TASKS: &str = "tasks";
pub const KEY_WEDDING_TASKS: &str = "weddingTasks";
pub const KEY_WEDDING_GUESTS: &str = "weddingGuests";
pub const KEY_SAVINGS: &str = "savings";
pub const KEY_DOLLARS: &str = "dollars";
pub const KEY_EXPORT_DATE: &str = "exportDate";

/// Document keys restored by import, in export order.
pub const DATA_KEYS: [&str; 13] = [
    KEY_MOVEMENTS,
    KEY_GOALS,
    KEY_BUDGETS,
    KEY_IDEAS,
    KEY_TRENDS,
    KEY_VIDEO_STATS,
    KEY_HASHTAGS,
    KEY_OKRS,
    KEY_TASKS,
    KEY_WEDDING_TASKS,
    KEY_WEDDING_GUESTS,
    KEY_SAVINGS,
    KEY_DOLLARS,
];

/// Point-in-time copy of the whole workspace.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Snapshot {
    pub movements: Vec<Movement>,
    pub goals: Vec<Goal>,
    pub budgets: Vec<Budget>,
    pub ideas: Vec<Idea>,
    pub trends: Vec<Trend>,
    pub video_stats: Vec<VideoStat>,
    pub hashtags: Vec<HashtagGroup>,
    pub okrs: Vec<Okr>,
    pub tasks: Vec<Task>,
    pub wedding_tasks: Vec<WeddingTask>,
    pub wedding_guests: Vec<Guest>,
    #[serde(deserialize_with = "lenient_f64")]
    pub savings: f64,
    pub dollars: DollarAccount,
    pub export_date: DateTime<Utc>,
}

impl Snapshot {
    /// Renders the document; `pretty` indents with two spaces.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    /// Total number of records across all collections.
    pub fn record_count(&self) -> usize {
        self.movements.len()
            + self.goals.len()
            + self.budgets.len()
            + self.ideas.len()
            + self.trends.len()
            + self.video_stats.len()
            + self.hashtags.len()
            + self.okrs.len()
            + self.tasks.len()
            + self.wedding_tasks.len()
            + self.wedding_guests.len()
    }
}

/// Import failures. When returned, no slot has been modified.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("backup is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),
    #[error("backup root must be a JSON object")]
    NotAnObject,
    #[error("backup key `{key}` has invalid content: {source}")]
    InvalidCollection {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// What an import replaced and what it skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Known keys whose slot was replaced, in export key order ([`DATA_KEYS`]).
    pub imported: Vec<&'static str>,
    /// Keys not recognized as workspace data.
    pub ignored: Vec<String>,
    /// Records written across all replaced collections.
    pub records: usize,
}

/// Copies every slot of `workspace`, stamped with the workspace clock.
pub fn export_snapshot(workspace: &Workspace) -> Snapshot {
    let snapshot = Snapshot {
        movements: workspace.movements.items().to_vec(),
        goals: workspace.goals.items().to_vec(),
        budgets: workspace.budgets.items().to_vec(),
        ideas: workspace.ideas.items().to_vec(),
        trends: workspace.trends.items().to_vec(),
        video_stats: workspace.video_stats.items().to_vec(),
        hashtags: workspace.hashtags.items().to_vec(),
        okrs: workspace.okrs.items().to_vec(),
        tasks: workspace.tasks.items().to_vec(),
        wedding_tasks: workspace.wedding_tasks.items().to_vec(),
        wedding_guests: workspace.wedding_guests.items().to_vec(),
        savings: *workspace.savings.get(),
        dollars: workspace.dollars.get().clone(),
        export_date: workspace.clock().now(),
    };
    info!(
        "event=snapshot_export module=snapshot status=ok records={}",
        snapshot.record_count()
    );
    snapshot
}

/// Default download name for a backup taken on `date`.
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("pitiqq-backup-{}.json", date.format("%Y-%m-%d"))
}

#[derive(Default)]
struct StagedImport {
    movements: Option<Vec<Movement>>,
    goals: Option<Vec<Goal>>,
    budgets: Option<Vec<Budget>>,
    ideas: Option<Vec<Idea>>,
    trends: Option<Vec<Trend>>,
    video_stats: Option<Vec<VideoStat>>,
    hashtags: Option<Vec<HashtagGroup>>,
    okrs: Option<Vec<Okr>>,
    tasks: Option<Vec<Task>>,
    wedding_tasks: Option<Vec<WeddingTask>>,
    wedding_guests: Option<Vec<Guest>>,
    savings: Option<Amount>,
    dollars: Option<DollarAccount>,
}

#[derive(Deserialize)]
struct Amount(#[serde(deserialize_with = "lenient_f64")] f64);

fn stage<T: DeserializeOwned>(
    root: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<T>, ImportError> {
    match root.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => T::deserialize(value)
            .map(Some)
            .map_err(|source| ImportError::InvalidCollection { key, source }),
    }
}

impl StagedImport {
    fn from_root(root: &Map<String, Value>) -> Result<Self, ImportError> {
        Ok(Self {
            movements: stage(root, KEY_MOVEMENTS)?,
            goals: stage(root, KEY_GOALS)?,
            budgets: stage(root, KEY_BUDGETS)?,
            ideas: stage(root, KEY_IDEAS)?,
            trends: stage(root, KEY_TRENDS)?,
            video_stats: stage(root, KEY_VIDEO_STATS)?,
            hashtags: stage(root, KEY_HASHTAGS)?,
            okrs: stage(root, KEY_OKRS)?,
            tasks: stage(root, KEY_TASKS)?,
            wedding_tasks: stage(root, KEY_WEDDING_TASKS)?,
            wedding_guests: stage(root, KEY_WEDDING_GUESTS)?,
            savings: stage(root, KEY_SAVINGS)?,
            dollars: stage(root, KEY_DOLLARS)?,
        })
    }

    fn apply(self, workspace: &mut Workspace, report: &mut ImportReport) {
        fn put<R: Record>(
            collection: &mut Collection<R>,
            records: Option<Vec<R>>,
            key: &'static str,
            report: &mut ImportReport,
        ) {
            if let Some(records) = records {
                report.records += records.len();
                report.imported.push(key);
                collection.replace_all(records);
            }
        }

        put(&mut workspace.movements, self.movements, KEY_MOVEMENTS, report);
        put(&mut workspace.goals, self.goals, KEY_GOALS, report);
        put(&mut workspace.budgets, self.budgets, KEY_BUDGETS, report);
        put(&mut workspace.ideas, self.ideas, KEY_IDEAS, report);
        put(&mut workspace.trends, self.trends, KEY_TRENDS, report);
        put(&mut workspace.video_stats, self.video_stats, KEY_VIDEO_STATS, report);
        put(&mut workspace.hashtags, self.hashtags, KEY_HASHTAGS, report);
        put(&mut workspace.okrs, self.okrs, KEY_OKRS, report);
        put(&mut workspace.tasks, self.tasks, KEY_TASKS, report);
        put(&mut workspace.wedding_tasks, self.wedding_tasks, KEY_WEDDING_TASKS, report);
        put(&mut workspace.wedding_guests, self.wedding_guests, KEY_WEDDING_GUESTS, report);

        if let Some(Amount(savings)) = self.savings {
            let savings = if savings.is_finite() { savings.max(0.0) } else { 0.0 };
            workspace.savings.set(savings);
            report.imported.push(KEY_SAVINGS);
        }
        if let Some(dollars) = self.dollars {
            workspace.dollars.set(dollars);
            report.imported.push(KEY_DOLLARS);
        }
    }
}

/// Restores a backup document into `workspace`.
///
/// # Errors
/// - `MalformedJson` / `NotAnObject` when the document cannot be read.
/// - `InvalidCollection` when a present key does not decode; the first
///   offending key in export key order ([`DATA_KEYS`]) is reported.
pub fn import_snapshot(
    workspace: &mut Workspace,
    json: &str,
) -> Result<ImportReport, ImportError> {
    let root: Value = serde_json::from_str(json).map_err(|err| {
        warn!("event=snapshot_import module=snapshot status=error reason=malformed_json");
        ImportError::MalformedJson(err)
    })?;
    let Value::Object(root) = root else {
        warn!("event=snapshot_import module=snapshot status=error reason=not_an_object");
        return Err(ImportError::NotAnObject);
    };

    let staged = StagedImport::from_root(&root).map_err(|err| {
        if let ImportError::InvalidCollection { key, .. } = &err {
            warn!("event=snapshot_import module=snapshot status=error reason=invalid_key key={key}");
        }
        err
    })?;

    let mut report = ImportReport {
        ignored: root
            .keys()
            .filter(|key| key.as_str() != KEY_EXPORT_DATE && !DATA_KEYS.contains(&key.as_str()))
            .cloned()
            .collect(),
        ..ImportReport::default()
    };
    staged.apply(workspace, &mut report);

    info!(
        "event=snapshot_import module=snapshot status=ok keys={} records={} ignored={}",
        report.imported.len(),
        report.records,
        report.ignored.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::{backup_file_name, export_snapshot, import_snapshot, ImportError, Snapshot};
    use crate::service::workspace::{FixedClock, Workspace};
    use crate::storage::MemoryStorage;
    use crate::store::Store;
    use chrono::{NaiveDate, TimeZone, Utc};
    use serde_json::json;

    fn workspace() -> Workspace {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap());
        Workspace::with_clock(&Store::new(MemoryStorage::new()), clock).unwrap()
    }

    #[test]
    fn export_uses_camel_case_keys_and_clock_stamp() {
        let workspace = workspace();
        let value = serde_json::to_value(export_snapshot(&workspace)).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("videoStats"));
        assert!(object.contains_key("weddingGuests"));
        assert_eq!(object["exportDate"], json!("2024-06-01T08:30:00Z"));
    }

    #[test]
    fn pretty_and_compact_documents_decode_alike() {
        let snapshot = export_snapshot(&workspace());
        let pretty = snapshot.to_json(true).unwrap();
        let compact = snapshot.to_json(false).unwrap();
        assert!(pretty.contains('\n'));
        assert!(!compact.contains('\n'));
        let decoded: Snapshot = serde_json::from_str(&pretty).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn invalid_key_aborts_before_any_write() {
        let mut workspace = workspace();
        workspace.savings.set(10.0);
        let payload = json!({
            "savings": 99.0,
            "goals": "not a list",
        });

        let err = import_snapshot(&mut workspace, &payload.to_string()).unwrap_err();
        assert!(matches!(err, ImportError::InvalidCollection { key: "goals", .. }));
        assert_eq!(*workspace.savings.get(), 10.0);
    }

    #[test]
    fn unknown_and_null_keys_are_reported_or_skipped() {
        let mut workspace = workspace();
        let payload = json!({
            "ideas": null,
            "theme": "dark",
            "exportDate": "2024-01-01T00:00:00Z",
            "savings": 42.5,
        });
        let report = import_snapshot(&mut workspace, &payload.to_string()).unwrap();
        assert_eq!(report.imported, vec!["savings"]);
        assert_eq!(report.ignored, vec!["theme".to_string()]);
        assert_eq!(*workspace.savings.get(), 42.5);
    }

    #[test]
    fn non_object_root_is_rejected() {
        let mut workspace = workspace();
        assert!(matches!(
            import_snapshot(&mut workspace, "[1, 2]"),
            Err(ImportError::NotAnObject)
        ));
        assert!(matches!(
            import_snapshot(&mut workspace, "{oops"),
            Err(ImportError::MalformedJson(_))
        ));
    }

    #[test]
    fn backup_file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
        assert_eq!(backup_file_name(date), "pitiqq-backup-2024-02-09.json");
    }
}
