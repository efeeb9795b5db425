//! Workspace: the repository object holding every bound slot.
//!
//! # Invariants
//! - Each slot name below is bound exactly once per `Store` while a
//!   `Workspace` is alive; opening a second workspace on the same store
//!   fails with `StoreError::AlreadyBound`.

use crate::model::content::{HashtagGroup, Idea, Trend, VideoStat};
use crate::model::finance::{Budget, DollarAccount, Goal, Movement};
use crate::model::planning::{Guest, Okr, Task, WeddingTask};
use crate::store::{Collection, Persisted, Store, StoreResult};
use chrono::{DateTime, NaiveDate, Utc};
use log::info;

/// Logical slot names (appended to the store prefix).
pub mod slots {
    pub const MOVEMENTS: &str = "movements";
    pub const GOALS: &str = "goals";
    pub const BUDGETS: &str = "budgets";
    pub const IDEAS: &str = "ideas";
    pub const TRENDS: &str = "trends";
    pub const VIDEO_STATS: &str = "video_stats";
    pub const HASHTAGS: &str = "hashtags";
    pub const OKRS: &str = "okrs";
    pub const TASKS: &str = "tasks";
    pub const WEDDING_TASKS: &str = "wedding_tasks";
    pub const WEDDING_GUESTS: &str = "wedding_guests";
    pub const SAVINGS: &str = "savings";
    pub const DOLLARS: &str = "dollars";
    pub const DARK_MODE: &str = "dark_mode";
}

/// Time source for creation and completion stamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// `YYYY-MM` of `today()`.
    fn current_month(&self) -> String {
        self.today().format("%Y-%m").to_string()
    }
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Every collection and value slot of the application, bound on one store.
///
/// Fields are public so view-models can read snapshots directly; all
/// mutations still go through the collection/slot write-through APIs.
pub struct Workspace {
    store: Store,
    clock: Box<dyn Clock>,
    pub movements: Collection<Movement>,
    pub goals: Collection<Goal>,
    pub budgets: Collection<Budget>,
    pub ideas: Collection<Idea>,
    pub trends: Collection<Trend>,
    pub video_stats: Collection<VideoStat>,
    pub hashtags: Collection<HashtagGroup>,
    pub okrs: Collection<Okr>,
    pub tasks: Collection<Task>,
    pub wedding_tasks: Collection<WeddingTask>,
    pub wedding_guests: Collection<Guest>,
    pub savings: Persisted<f64>,
    pub dollars: Persisted<DollarAccount>,
    pub dark_mode: Persisted<bool>,
}

impl Workspace {
    /// Binds every slot using the system clock.
    pub fn open(store: &Store) -> StoreResult<Self> {
        Self::with_clock(store, SystemClock)
    }

    pub fn with_clock(store: &Store, clock: impl Clock + 'static) -> StoreResult<Self> {
        let workspace = Self {
            store: store.clone(),
            clock: Box::new(clock),
            movements: Collection::bind(store, slots::MOVEMENTS)?,
            goals: Collection::bind(store, slots::GOALS)?,
            budgets: Collection::bind(store, slots::BUDGETS)?,
            ideas: Collection::bind(store, slots::IDEAS)?,
            trends: Collection::bind(store, slots::TRENDS)?,
            video_stats: Collection::bind(store, slots::VIDEO_STATS)?,
            hashtags: Collection::bind(store, slots::HASHTAGS)?,
            okrs: Collection::bind(store, slots::OKRS)?,
            tasks: Collection::bind(store, slots::TASKS)?,
            wedding_tasks: Collection::bind(store, slots::WEDDING_TASKS)?,
            wedding_guests: Collection::bind(store, slots::WEDDING_GUESTS)?,
            savings: store.bind(slots::SAVINGS, 0.0)?,
            dollars: store.bind(slots::DOLLARS, DollarAccount::default())?,
            dark_mode: store.bind(slots::DARK_MODE, true)?,
        };
        info!(
            "event=workspace_open module=service status=ok prefix={} movements={} ideas={} tasks={}",
            store.config().key_prefix,
            workspace.movements.len(),
            workspace.ideas.len(),
            workspace.tasks.len()
        );
        Ok(workspace)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Empties every collection and resets savings and the currency
    /// account. The theme preference is kept.
    pub fn clear_all(&mut self) {
        self.movements.clear();
        self.goals.clear();
        self.budgets.clear();
        self.ideas.clear();
        self.trends.clear();
        self.video_stats.clear();
        self.hashtags.clear();
        self.okrs.clear();
        self.tasks.clear();
        self.wedding_tasks.clear();
        self.wedding_guests.clear();
        self.savings.reset();
        self.dollars.reset();
        info!("event=workspace_clear module=service status=ok");
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode.update(|enabled| {
            *enabled = !*enabled;
            *enabled
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{slots, Clock, FixedClock, Workspace};
    use crate::model::finance::{Movement, MovementKind};
    use crate::storage::MemoryStorage;
    use crate::store::{Store, StoreError};
    use chrono::{TimeZone, Utc};

    #[test]
    fn second_workspace_on_same_store_is_rejected() {
        let store = Store::new(MemoryStorage::new());
        let _first = Workspace::open(&store).unwrap();
        assert!(matches!(
            Workspace::open(&store),
            Err(StoreError::AlreadyBound(_))
        ));
    }

    #[test]
    fn workspace_reopens_with_persisted_data() {
        let store = Store::new(MemoryStorage::new());
        {
            let mut workspace = Workspace::open(&store).unwrap();
            workspace.movements.append(Movement::new(
                MovementKind::Expense,
                "2024-01-01",
                10.0,
                "comida",
            ));
            assert!(!workspace.toggle_dark_mode());
        }

        let workspace = Workspace::open(&store).unwrap();
        assert_eq!(workspace.movements.len(), 1);
        assert!(!*workspace.dark_mode.get());
        assert!(store.slot_names().contains(&slots::MOVEMENTS.to_string()));
    }

    #[test]
    fn clear_all_empties_collections_but_keeps_theme() {
        let store = Store::new(MemoryStorage::new());
        let mut workspace = Workspace::open(&store).unwrap();
        workspace.savings.set(500.0);
        workspace.toggle_dark_mode();
        workspace.movements.append(Movement::default());

        workspace.clear_all();
        assert!(workspace.movements.is_empty());
        assert_eq!(*workspace.savings.get(), 0.0);
        assert!(!*workspace.dark_mode.get());
    }

    #[test]
    fn fixed_clock_derives_today_and_month() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 7, 3, 15, 0, 0).unwrap());
        assert_eq!(clock.today().to_string(), "2024-07-03");
        assert_eq!(clock.current_month(), "2024-07");
    }
}
