use pitiqq_core::model::finance::{Goal, Movement, MovementKind};
use pitiqq_core::{
    open_db, Collection, FinanceService, SqliteStorage, Store, StoreConfig, Workspace,
};
use serde_json::{json, Value};
use std::path::Path;

fn seed(path: &Path, key: &str, value: &str) {
    let conn = open_db(path).unwrap();
    conn.execute(
        "INSERT INTO storage_slots (key, value) VALUES (?1, ?2);",
        [key, value],
    )
    .unwrap();
}

fn open_store(path: &Path) -> Store {
    Store::new(SqliteStorage::new(open_db(path).unwrap()))
}

#[test]
fn collections_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pitiqq.db");

    let id = {
        let store = open_store(&path);
        let mut movements: Collection<Movement> = Collection::bind(&store, "movements").unwrap();
        movements
            .append(Movement::new(MovementKind::Income, "2024-04-02", 900.0, "sueldo"))
            .id
    };

    let store = open_store(&path);
    let movements: Collection<Movement> = Collection::bind(&store, "movements").unwrap();
    let stored = movements.find(&id).unwrap();
    assert_eq!(stored.amount, 900.0);
    assert_eq!(stored.kind, MovementKind::Income);
    assert_eq!(store.slot_names(), vec!["movements".to_string()]);
}

#[test]
fn rejected_write_keeps_memory_value_and_previous_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("small.db");

    {
        let store = Store::new(SqliteStorage::new(open_db(&path).unwrap()).with_capacity(64));
        let mut note = store.bind("note", String::new()).unwrap();
        note.set("short".to_string());
        note.set("x".repeat(256));
        assert_eq!(note.get().len(), 256);
        assert!(!note.flush());
    }

    let store = open_store(&path);
    assert_eq!(store.read("note", String::new()), "short");
}

#[test]
fn malformed_row_falls_back_to_default_and_is_kept_aside() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.db");
    seed(&path, "pitiqq_goals", "{not json");

    let store = open_store(&path);
    let mut goals: Collection<Goal> = Collection::bind(&store, "goals").unwrap();
    assert!(goals.is_empty());

    goals.append(Goal::new("Trip", 500.0, None));
    assert_eq!(
        store.read("goals_unreadable", Value::Null),
        json!(["{not json"])
    );
}

#[test]
fn goals_with_null_target_survive_opening_and_appending() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");
    seed(
        &path,
        "pitiqq_goals",
        r#"[{"id":"g1","name":"Viaje","target":1000,"current":0,"contributions":[]},
            {"id":"g2","name":"Auto","target":null,"current":0,"contributions":[]}]"#,
    );

    let store = open_store(&path);
    let mut workspace = Workspace::open(&store).unwrap();
    assert_eq!(workspace.goals.len(), 2);
    FinanceService::new(&mut workspace)
        .create_goal("Casa", 5000.0, None)
        .unwrap();
    drop(workspace);

    let stored: Vec<Goal> = open_store(&path).read("goals", Vec::new());
    let ids: Vec<&str> = stored.iter().map(|goal| goal.id.as_str()).collect();
    assert_eq!(ids.len(), 3);
    assert_eq!(&ids[..2], &["g1", "g2"]);
    assert_eq!(stored[1].target, 0.0);
}

#[test]
fn one_unreadable_goal_does_not_wipe_its_neighbours() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.db");
    seed(
        &path,
        "pitiqq_goals",
        r#"[{"id":"g1","name":"Viaje","target":1000},{"id":"g2","contributions":"oops"}]"#,
    );

    let store = open_store(&path);
    let mut workspace = Workspace::open(&store).unwrap();
    FinanceService::new(&mut workspace)
        .create_goal("Casa", 5000.0, None)
        .unwrap();

    let stored: Vec<Goal> = store.read("goals", Vec::new());
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].id.as_str(), "g1");
    assert_eq!(
        store.read("goals_unreadable", Value::Null),
        json!([{"id": "g2", "contributions": "oops"}])
    );
}

#[test]
fn prefixes_isolate_stores_sharing_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.db");

    let first = open_store(&path);
    let second = Store::with_config(
        SqliteStorage::new(open_db(&path).unwrap()),
        StoreConfig {
            key_prefix: "other_".to_string(),
        },
    );

    assert!(first.write("savings", &10.0));
    assert!(second.write("savings", &20.0));
    assert_eq!(first.read("savings", 0.0), 10.0);
    assert_eq!(second.read("savings", 0.0), 20.0);
}
