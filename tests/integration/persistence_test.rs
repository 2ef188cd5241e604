//! Startup hydration and save/restart cycles against real storage backends.

use mapty::controller::AppEvent;
use mapty::storage::config::{AppConfig, StorageBackend};
use mapty::storage::{open_slot, FileSlot, MemorySlot, SqliteSlot, WORKOUTS_KEY};
use mapty::workouts::{Coords, WorkoutId};
use tempfile::tempdir;

use crate::mock_host::{controller_with, running_input, HOME};

const SNAPSHOT: &str = r#"[
    {"id": 4, "createdAt": "2024-05-02T09:30:00Z", "coords": [10.0, 10.0], "distance": 5.0,
     "duration": 25.0, "type": "running", "cadence": 150.0, "pace": 5, "description": "Running on May 2"},
    {"id": 7, "date": "2024-05-03T09:30:00Z", "coords": [11.0, 11.0], "distance": 20.0,
     "duration": 60.0, "type": "cycling", "elevationGain": -5.0, "description": "Cycling on May 3"}
]"#;

#[test]
fn test_hydrated_workouts_get_markers_once_map_is_ready() {
    let mut controller = controller_with(MemorySlot::with_entry(WORKOUTS_KEY, SNAPSHOT));
    controller.startup();

    assert_eq!(controller.store().len(), 2);
    assert_eq!(controller.viewport().list.entries.len(), 2);
    assert!(controller.markers().is_empty());

    controller.handle(AppEvent::PositionResolved(Ok(HOME)));

    assert_eq!(controller.markers().len(), 2);
    assert!(controller.markers().contains(WorkoutId(4)));
    assert!(controller.markers().contains(WorkoutId(7)));
    assert_eq!(controller.map().markers.len(), 2);
}

#[test]
fn test_hydrated_workouts_behave_like_new_ones() {
    let mut controller = controller_with(MemorySlot::with_entry(WORKOUTS_KEY, SNAPSHOT));
    controller.startup();

    let running = controller.store().find_by_id(WorkoutId(4)).unwrap();
    assert_eq!(running.pace(), Some(5));
    let cycling = controller.store().find_by_id(WorkoutId(7)).unwrap();
    assert_eq!(cycling.speed(), Some(20));
    assert_eq!(cycling.elevation_gain(), Some(-5.0));
}

#[test]
fn test_new_ids_continue_after_hydrated_ones() {
    let mut controller = controller_with(MemorySlot::with_entry(WORKOUTS_KEY, SNAPSHOT));
    controller.startup();
    controller.position_resolved(Ok(HOME));

    controller.handle(AppEvent::MapClick(Coords::new(1.0, 1.0)));
    controller.handle(AppEvent::Submit(running_input("3", "18", "170")));

    let added = controller.store().all().last().unwrap();
    assert!(added.id() > WorkoutId(7));
    assert_eq!(controller.store().len(), 3);
}

#[test]
fn test_malformed_snapshot_starts_empty() {
    let mut controller = controller_with(MemorySlot::with_entry(WORKOUTS_KEY, "{not json"));
    controller.startup();

    assert!(controller.store().is_empty());
    assert!(controller.viewport().alerts.is_empty());
}

#[test]
fn test_sqlite_restart_restores_workouts() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mapty.db");

    {
        let mut controller = controller_with(SqliteSlot::open(&path).unwrap());
        controller.startup();
        controller.position_resolved(Ok(HOME));
        controller.handle(AppEvent::MapClick(Coords::new(10.0, 10.0)));
        controller.handle(AppEvent::Submit(running_input("5", "25", "150")));
        assert!(controller.last_save_error().is_none());
    }

    let mut controller = controller_with(SqliteSlot::open(&path).unwrap());
    controller.startup();

    assert_eq!(controller.store().len(), 1);
    let workout = &controller.store().all()[0];
    assert_eq!(workout.coords(), Coords::new(10.0, 10.0));
    assert_eq!(workout.pace(), Some(5));
}

#[test]
fn test_file_restart_reflects_deletes() {
    let dir = tempdir().unwrap();

    let deleted = {
        let mut controller = controller_with(FileSlot::open(dir.path()).unwrap());
        controller.startup();
        controller.position_resolved(Ok(HOME));
        for lat in [1.0, 2.0] {
            controller.handle(AppEvent::MapClick(Coords::new(lat, lat)));
            controller.handle(AppEvent::Submit(running_input("5", "25", "150")));
        }
        let first = controller.store().all()[0].id();
        controller.delete(first);
        first
    };

    let mut controller = controller_with(FileSlot::open(dir.path()).unwrap());
    controller.startup();

    assert_eq!(controller.store().len(), 1);
    assert!(controller.store().find_by_id(deleted).is_none());
}

#[test]
fn test_open_slot_follows_configured_backend() {
    let dir = tempdir().unwrap();

    for backend in [StorageBackend::Sqlite, StorageBackend::File] {
        let mut config = AppConfig::default();
        config.data_dir = dir.path().to_path_buf();
        config.storage.backend = backend;
        config.storage.path = format!("{:?}", backend).to_lowercase();

        let mut controller = controller_with(open_slot(&config).unwrap());
        controller.startup();
        controller.position_resolved(Ok(HOME));
        controller.handle(AppEvent::MapClick(HOME));
        controller.handle(AppEvent::Submit(running_input("5", "25", "150")));

        let mut reopened = controller_with(open_slot(&config).unwrap());
        reopened.startup();
        assert_eq!(reopened.store().len(), 1, "backend {:?}", backend);
    }
}
