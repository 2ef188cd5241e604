//! Unit tests for list rendering and marker bookkeeping.

use mapty::map::{MapWidget, MarkerRegistry, Popup};
use mapty::ui::render::{place_marker, popup, remove_marker, render_list};
use mapty::ui::ListAction;
use mapty::workouts::{Coords, Workout, WorkoutId};

fn sample() -> Vec<Workout> {
    vec![
        Workout::running(WorkoutId(1), Coords::new(10.0, 10.0), 5.0, 25.0, 150.0).unwrap(),
        Workout::cycling(WorkoutId(2), Coords::new(11.0, 11.0), 20.0, 60.0, -5.0).unwrap(),
    ]
}

/// Counts live markers only.
#[derive(Default)]
struct CountingMap {
    live: Vec<u8>,
    next: u8,
}

impl MapWidget for CountingMap {
    type Marker = u8;

    fn set_view(&mut self, _center: Coords, _zoom: u8) {}

    fn fly_to(&mut self, _center: Coords, _zoom: u8) {}

    fn add_marker(&mut self, _coords: Coords, _popup: &Popup) -> u8 {
        self.next += 1;
        self.live.push(self.next);
        self.next
    }

    fn remove_marker(&mut self, marker: u8) {
        self.live.retain(|m| *m != marker);
    }
}

#[test]
fn test_render_is_idempotent() {
    let workouts = sample();
    assert_eq!(render_list(&workouts), render_list(&workouts));
}

#[test]
fn test_render_follows_store_order() {
    let workouts = sample();
    let list = render_list(&workouts);

    let ids: Vec<WorkoutId> = list.entries.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![WorkoutId(1), WorkoutId(2)]);

    let running = list.markup.find("data-id=\"1\"").unwrap();
    let cycling = list.markup.find("data-id=\"2\"").unwrap();
    assert!(running < cycling);
}

#[test]
fn test_entries_show_type_specific_metrics() {
    let list = render_list(&sample());

    let running: Vec<&str> = list.entries[0].details.iter().map(|d| d.unit).collect();
    assert_eq!(running, vec!["km", "min", "min/km", "spm"]);
    assert_eq!(list.entries[0].details[2].value, "5");

    let cycling: Vec<&str> = list.entries[1].details.iter().map(|d| d.unit).collect();
    assert_eq!(cycling, vec!["km", "min", "km/h", "m"]);
    assert_eq!(list.entries[1].details[2].value, "20");
    assert_eq!(list.entries[1].details[3].value, "-5");
}

#[test]
fn test_actions_are_bound_per_entry() {
    let list = render_list(&sample());

    assert_eq!(list.action(WorkoutId(2), "edit"), Some(ListAction::Edit(WorkoutId(2))));
    assert_eq!(
        list.action(WorkoutId(1), "delete"),
        Some(ListAction::Delete(WorkoutId(1)))
    );
    assert_eq!(list.action(WorkoutId(3), "edit"), None);
}

#[test]
fn test_popup_carries_description_and_type_class() {
    let workouts = sample();
    let popup = popup(&workouts[1]);

    assert_eq!(popup.content, workouts[1].description());
    assert_eq!(popup.class_name, "cycling-popup");
}

#[test]
fn test_registry_tracks_one_marker_per_workout() {
    let workouts = sample();
    let mut map = CountingMap::default();
    let mut registry = MarkerRegistry::new();

    for workout in &workouts {
        place_marker(&mut map, &mut registry, workout);
    }
    // Re-placing replaces rather than duplicates
    place_marker(&mut map, &mut registry, &workouts[0]);

    assert_eq!(registry.len(), 2);
    assert_eq!(map.live.len(), 2);

    assert!(remove_marker(&mut map, &mut registry, WorkoutId(1)));
    assert!(registry.get(WorkoutId(1)).is_none());
    assert_eq!(map.live.len(), 1);
    assert!(!remove_marker(&mut map, &mut registry, WorkoutId(1)));
}

#[test]
fn test_action_names_and_targets() {
    let list = render_list(&sample());

    for (id, name) in [(WorkoutId(1), "select"), (WorkoutId(2), "edit"), (WorkoutId(1), "delete")] {
        let action = list.action(id, name).unwrap();
        assert_eq!(action.workout_id(), id);
        assert_eq!(action.name(), name);
    }
}
