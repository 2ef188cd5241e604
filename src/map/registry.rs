//! Workout id to marker handle side table.

use std::collections::HashMap;

use crate::workouts::WorkoutId;

/// Maps each workout to the marker drawn for it.
///
/// The registry performs no consistency checks of its own; the controller
/// keeps it in step with the workout store.
#[derive(Debug)]
pub struct MarkerRegistry<H> {
    markers: HashMap<WorkoutId, H>,
}

impl<H> Default for MarkerRegistry<H> {
    fn default() -> Self {
        Self {
            markers: HashMap::new(),
        }
    }
}

impl<H> MarkerRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `marker` for `id`, returning any handle it replaces.
    pub fn put(&mut self, id: WorkoutId, marker: H) -> Option<H> {
        self.markers.insert(id, marker)
    }

    pub fn get(&self, id: WorkoutId) -> Option<&H> {
        self.markers.get(&id)
    }

    pub fn remove(&mut self, id: WorkoutId) -> Option<H> {
        self.markers.remove(&id)
    }

    pub fn contains(&self, id: WorkoutId) -> bool {
        self.markers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
