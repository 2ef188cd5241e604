//! Unit tests for the persisted workout snapshot.

use mapty::storage::persistence::WorkoutRecord;
use mapty::storage::persistence::REJECTED_KEY;
use mapty::storage::{MemorySlot, SqliteSlot, StorageSlot, WorkoutPersistence, WORKOUTS_KEY};
use mapty::workouts::{Coords, Workout, WorkoutId};

/// Deterministic xorshift generator so failures reproduce.
struct Rng(u64);

impl Rng {
    fn next_u64(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    /// Uniform value in `[lo, hi)` using the full 53-bit mantissa.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        lo + unit * (hi - lo)
    }

    /// Strictly positive value spread over several orders of magnitude.
    fn positive(&mut self) -> f64 {
        let value = self.range(0.0, 1.0) * 10f64.powi((self.next_u64() % 7) as i32 - 2);
        if value > 0.0 {
            value
        } else {
            f64::MIN_POSITIVE
        }
    }
}

fn random_workouts(rng: &mut Rng, count: u64) -> Vec<Workout> {
    (1..=count)
        .map(|id| {
            let coords = Coords::new(rng.range(-90.0, 90.0), rng.range(-180.0, 180.0));
            let (distance, duration) = (rng.positive(), rng.positive());
            if rng.next_u64() % 2 == 0 {
                Workout::running(WorkoutId(id), coords, distance, duration, rng.positive())
            } else {
                let elevation_gain = rng.range(-1e4, 1e4);
                Workout::cycling(WorkoutId(id), coords, distance, duration, elevation_gain)
            }
            .unwrap()
        })
        .collect()
}

fn workouts() -> Vec<Workout> {
    vec![
        Workout::running(WorkoutId(1), Coords::new(51.5, -0.12), 5.0, 25.0, 150.0).unwrap(),
        Workout::cycling(WorkoutId(2), Coords::new(45.1, 7.6), 42.5, 95.0, 610.0).unwrap(),
        Workout::running(WorkoutId(5), Coords::new(-33.9, 151.2), 0.8, 4.5, 182.0).unwrap(),
    ]
}

#[test]
fn test_load_returns_what_was_saved() {
    let mut persistence = WorkoutPersistence::new(MemorySlot::new());
    let saved = workouts();

    persistence.save(&saved).unwrap();
    let loaded = persistence.load();

    assert_eq!(loaded, saved);
}

#[test]
fn test_round_trip_through_sqlite() {
    let mut persistence = WorkoutPersistence::new(SqliteSlot::open_in_memory().unwrap());
    let saved = workouts();

    persistence.save(&saved).unwrap();
    assert_eq!(persistence.load(), saved);

    persistence.save(&saved[..1]).unwrap();
    assert_eq!(persistence.load(), saved[..1].to_vec());
}

#[test]
fn test_snapshot_record_fields() {
    let mut persistence = WorkoutPersistence::new(MemorySlot::new());
    persistence.save(&workouts()[..2]).unwrap();

    let json = persistence.slot().read(WORKOUTS_KEY).unwrap().unwrap();
    let records: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();

    let running = records[0].as_object().unwrap();
    for field in ["id", "createdAt", "coords", "distance", "duration", "type", "cadence", "description"] {
        assert!(running.contains_key(field), "running record missing {}", field);
    }
    assert_eq!(records[0]["type"], "running");

    let cycling = records[1].as_object().unwrap();
    assert!(cycling.contains_key("elevationGain"));
    assert!(!cycling.contains_key("cadence"));
    assert_eq!(records[1]["type"], "cycling");
}

#[test]
fn test_persisted_metrics_are_recomputed() {
    let json = r#"[{"id": 1, "createdAt": "2024-05-02T09:30:00Z", "coords": [0.0, 0.0],
        "distance": 10.0, "duration": 25.0, "type": "running", "cadence": 150.0,
        "pace": 99, "description": "stale"}]"#;
    let mut persistence = WorkoutPersistence::new(MemorySlot::with_entry(WORKOUTS_KEY, json));

    let loaded = persistence.load();
    assert_eq!(loaded[0].pace(), Some(2));
    assert_ne!(loaded[0].description(), "stale");
}

#[test]
fn test_record_conversion_rejects_invalid_values() {
    let workout = &workouts()[0];
    let mut value = serde_json::to_value(WorkoutRecord::from(workout)).unwrap();
    value["distance"] = serde_json::json!(-1.0);

    let record: WorkoutRecord = serde_json::from_value(value).unwrap();
    assert!(Workout::try_from(record).is_err());
}

#[test]
fn test_unknown_type_record_is_skipped() {
    let json = r#"[
        {"id": 1, "createdAt": "2024-05-02T09:30:00Z", "coords": [0.0, 0.0], "distance": 1.0,
         "duration": 5.0, "type": "swimming", "strokes": 40},
        {"id": 2, "createdAt": "2024-05-02T09:30:00Z", "coords": [0.0, 0.0], "distance": 1.0,
         "duration": 5.0, "type": "running", "cadence": 170.0}
    ]"#;
    let mut persistence = WorkoutPersistence::new(MemorySlot::with_entry(WORKOUTS_KEY, json));

    let loaded = persistence.load();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id(), WorkoutId(2));
}

#[test]
fn test_arbitrary_floats_survive_round_trip() {
    let mut rng = Rng(0x9E37_79B9_7F4A_7C15);

    for _ in 0..20 {
        let saved = random_workouts(&mut rng, 1000);
        let mut persistence = WorkoutPersistence::new(MemorySlot::new());

        persistence.save(&saved).unwrap();
        let loaded = persistence.load();

        assert_eq!(loaded.len(), saved.len());
        for (loaded, saved) in loaded.iter().zip(&saved) {
            assert_eq!(loaded, saved, "workout {} changed on reload", saved.id());
        }
    }
}

#[test]
fn test_rejected_records_are_kept_verbatim() {
    let json = r#"[
        {"id": 1, "createdAt": "2024-05-02T09:30:00Z", "coords": [0.0, 0.0], "distance": 1.0,
         "duration": 5.0, "type": "swimming", "strokes": 40},
        {"id": 2, "createdAt": "2024-05-02T09:30:00Z", "coords": [0.0, 0.0], "distance": 1.0,
         "duration": 5.0, "type": "running", "cadence": 170.0},
        {"id": 3, "createdAt": "2024-05-02T09:30:00Z", "coords": [0.0, 0.0], "distance": -1.0,
         "duration": 5.0, "type": "running", "cadence": 170.0}
    ]"#;
    let mut persistence = WorkoutPersistence::new(MemorySlot::with_entry(WORKOUTS_KEY, json));

    let loaded = persistence.load();
    persistence.save(&loaded).unwrap();

    let kept = persistence.slot().read(REJECTED_KEY).unwrap().unwrap();
    let kept: Vec<serde_json::Value> = serde_json::from_str(&kept).unwrap();
    let original: Vec<serde_json::Value> = serde_json::from_str(json).unwrap();
    assert_eq!(kept, vec![original[0].clone(), original[2].clone()]);

    // A clean reload leaves the kept records alone
    assert_eq!(persistence.load().len(), 1);
    assert!(persistence.slot().read(REJECTED_KEY).unwrap().is_some());
}

#[test]
fn test_clean_load_writes_no_rejected_records() {
    let mut persistence = WorkoutPersistence::new(MemorySlot::new());
    persistence.save(&workouts()).unwrap();

    assert_eq!(persistence.load().len(), 3);
    assert!(persistence.slot().read(REJECTED_KEY).unwrap().is_none());
}
