use pitiqq_core::model::finance::{Goal, Movement, MovementKind};
use pitiqq_core::{
    export_snapshot, import_snapshot, open_db, FinanceService, ImportError, MemoryStorage,
    SqliteStorage, Store, Workspace,
};
use serde_json::json;

fn seeded_workspace(store: &Store) -> Workspace {
    let mut workspace = Workspace::open(store).unwrap();
    let mut finance = FinanceService::new(&mut workspace);
    finance.create_goal("Car", 5000.0, None).unwrap();
    finance
        .record_movement(Movement::new(MovementKind::Expense, "2024-02-11", 30.0, "comida"))
        .unwrap();
    finance.add_savings(250.0).unwrap();
    workspace
}

#[test]
fn importing_goals_replaces_only_goals() {
    let store = Store::new(MemoryStorage::new());
    let mut workspace = seeded_workspace(&store);
    let payload = json!({
        "goals": [{"id": "g1", "name": "Trip", "target": 1000, "current": 200}],
        "exportDate": "2024-01-01T00:00:00Z"
    });

    let report = import_snapshot(&mut workspace, &payload.to_string()).unwrap();

    assert_eq!(report.imported, vec!["goals"]);
    assert!(report.ignored.is_empty());
    assert_eq!(report.records, 1);
    assert_eq!(workspace.goals.len(), 1);
    let trip = &workspace.goals.items()[0];
    assert_eq!(trip.id.as_str(), "g1");
    assert_eq!(trip.name, "Trip");
    assert_eq!(trip.current, 200.0);
    assert!(trip.contributions.is_empty());
    assert_eq!(workspace.movements.len(), 1);
    assert_eq!(*workspace.savings.get(), 250.0);
}

#[test]
fn malformed_backup_changes_nothing() {
    let store = Store::new(MemoryStorage::new());
    let mut workspace = seeded_workspace(&store);
    let before = export_snapshot(&workspace);

    let err = import_snapshot(&mut workspace, "{\"goals\": [").unwrap_err();
    assert!(matches!(err, ImportError::MalformedJson(_)));

    let after = export_snapshot(&workspace);
    assert_eq!(after.goals, before.goals);
    assert_eq!(after.movements, before.movements);
    assert_eq!(after.savings, before.savings);
}

#[test]
fn one_bad_collection_blocks_the_whole_import() {
    let store = Store::new(MemoryStorage::new());
    let mut workspace = seeded_workspace(&store);
    let payload = json!({
        "movements": [],
        "ideas": [{"title": "ok"}],
        "tasks": {"not": "a list"}
    });

    let err = import_snapshot(&mut workspace, &payload.to_string()).unwrap_err();
    assert!(matches!(err, ImportError::InvalidCollection { key: "tasks", .. }));
    assert_eq!(workspace.movements.len(), 1);
    assert!(workspace.ideas.is_empty());
}

#[test]
fn lenient_records_import_with_defaults() {
    let store = Store::new(MemoryStorage::new());
    let mut workspace = Workspace::open(&store).unwrap();
    let payload = json!({
        "ideas": [{"id": "i1", "title": "Reel", "state": "archivado", "priority": null}],
        "tasks": [{"id": "t1", "title": "Pagar", "deadline": "", "completedAt": "nope"}],
        "weddingGuests": [{"id": "w1", "name": "Ana", "status": "confirmado", "companions": 1}]
    });

    import_snapshot(&mut workspace, &payload.to_string()).unwrap();

    let idea = &workspace.ideas.items()[0];
    assert_eq!(idea.state, Default::default());
    assert_eq!(idea.priority, Default::default());
    let task = &workspace.tasks.items()[0];
    assert_eq!(task.deadline, None);
    assert_eq!(task.completed_at, None);
    assert_eq!(workspace.wedding_guests.items()[0].head_count(), 2);
}

#[test]
fn loose_numbers_import_as_values_or_zero() {
    let store = Store::new(MemoryStorage::new());
    let mut workspace = Workspace::open(&store).unwrap();
    let payload = json!({
        "goals": [{"id": "g1", "target": null}],
        "videoStats": [{"id": "v1", "views": "1200", "likes": 3.7, "shares": -4}],
        "weddingGuests": [{"id": "w1", "name": "Ana", "companions": "2"}],
        "savings": "300.5"
    });

    let report = import_snapshot(&mut workspace, &payload.to_string()).unwrap();

    assert_eq!(report.imported, vec!["goals", "videoStats", "weddingGuests", "savings"]);
    assert_eq!(workspace.goals.items()[0].target, 0.0);
    let stat = &workspace.video_stats.items()[0];
    assert_eq!((stat.views, stat.likes, stat.shares), (1200, 3, 0));
    assert_eq!(workspace.wedding_guests.items()[0].head_count(), 3);
    assert_eq!(*workspace.savings.get(), 300.5);
}

#[test]
fn export_then_import_into_fresh_database_restores_everything() {
    let dir = tempfile::tempdir().unwrap();
    let source_store = Store::new(MemoryStorage::new());
    let source = seeded_workspace(&source_store);
    let document = export_snapshot(&source).to_json(true).unwrap();

    let target_store = Store::new(SqliteStorage::new(
        open_db(dir.path().join("restore.db")).unwrap(),
    ));
    let mut target = Workspace::open(&target_store).unwrap();
    let report = import_snapshot(&mut target, &document).unwrap();

    assert!(report.ignored.is_empty());
    assert_eq!(report.records, 2);
    assert_eq!(target.goals.items(), source.goals.items());
    assert_eq!(target.movements.items(), source.movements.items());
    assert_eq!(*target.savings.get(), 250.0);

    drop(target);
    let reopened = Workspace::open(&target_store).unwrap();
    let goal: &Goal = &reopened.goals.items()[0];
    assert_eq!(goal.name, "Car");
}
