//! In-memory workout collection.

use thiserror::Error;

use super::types::{Workout, WorkoutId};

/// Ordered collection of workouts.
///
/// Insertion order is the list and marker render order. The store also owns
/// id allocation so ids stay unique for its whole lifetime, including across
/// a hydration from a persisted snapshot.
#[derive(Debug, Clone)]
pub struct WorkoutStore {
    workouts: Vec<Workout>,
    next_id: u64,
}

impl Default for WorkoutStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkoutStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            workouts: Vec::new(),
            next_id: 1,
        }
    }

    /// Reserve a fresh id for a workout about to be created.
    pub fn allocate_id(&mut self) -> WorkoutId {
        let id = WorkoutId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append a workout.
    pub fn add(&mut self, workout: Workout) -> Result<(), StoreError> {
        let id = workout.id();
        if self.contains(id) {
            return Err(StoreError::DuplicateId(id));
        }

        self.bump_next_id(id);
        self.workouts.push(workout);
        Ok(())
    }

    pub fn find_by_id(&self, id: WorkoutId) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    pub fn find_by_id_mut(&mut self, id: WorkoutId) -> Option<&mut Workout> {
        self.workouts.iter_mut().find(|w| w.id() == id)
    }

    pub fn contains(&self, id: WorkoutId) -> bool {
        self.find_by_id(id).is_some()
    }

    /// Remove the workout with `id`. Returns whether anything was removed.
    pub fn remove_by_id(&mut self, id: WorkoutId) -> bool {
        match self.workouts.iter().position(|w| w.id() == id) {
            Some(index) => {
                self.workouts.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replace the whole collection, used when hydrating at startup.
    ///
    /// Later entries sharing an id with an earlier one are dropped.
    pub fn replace_all(&mut self, workouts: Vec<Workout>) {
        self.workouts.clear();
        self.next_id = 1;

        for workout in workouts {
            let id = workout.id();
            if self.contains(id) {
                tracing::warn!("Dropping duplicate workout id {} from snapshot", id);
                continue;
            }
            self.bump_next_id(id);
            self.workouts.push(workout);
        }
    }

    /// All workouts in insertion order.
    pub fn all(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    fn bump_next_id(&mut self, id: WorkoutId) {
        self.next_id = self.next_id.max(id.0.saturating_add(1));
    }
}

/// Store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Workout id already in store: {0}")]
    DuplicateId(WorkoutId),
}
