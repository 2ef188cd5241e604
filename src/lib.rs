//! Mapty - map-based workout logger
//!
//! Click a spot on the map, log a run or a ride there, and keep the list,
//! the map markers and local storage in step. A companion proxy server
//! streams images out of cloud blob storage.

pub mod controller;
pub mod map;
pub mod proxy;
pub mod storage;
pub mod ui;
pub mod workouts;

// Re-export commonly used types
pub use controller::{AppController, AppEvent, MapState};
pub use map::{MapWidget, MarkerRegistry};
pub use storage::config::AppConfig;
pub use storage::WorkoutPersistence;
pub use workouts::{Coords, Workout, WorkoutId, WorkoutStore};
