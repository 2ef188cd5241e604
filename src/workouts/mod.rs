//! Workout model and in-memory collection.

pub mod store;
pub mod types;

pub use store::{StoreError, WorkoutStore};
pub use types::{Coords, Workout, WorkoutEdit, WorkoutError, WorkoutId, WorkoutKind, WorkoutType};
