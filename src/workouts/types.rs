//! Workout value types.
//!
//! A workout is one exercise session pinned to a map location. The sport
//! specific field lives in a tagged [`WorkoutKind`] payload and the derived
//! metrics (pace, speed) are dispatched on that tag.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MINUTES_PER_HOUR: f64 = 60.0;

/// Unique workout identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(pub u64);

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Latitude/longitude pair in degrees.
///
/// Serialized as a `[lat, lng]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl Coords {
    /// Create a coordinate pair.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(coords: Coords) -> Self {
        [coords.lat, coords.lng]
    }
}

/// Workout discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    #[default]
    Running,
    Cycling,
}

impl WorkoutType {
    /// All selectable types, in form order.
    pub const ALL: [WorkoutType; 2] = [WorkoutType::Running, WorkoutType::Cycling];

    /// Lowercase tag used in storage and markup.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutType::Running => "running",
            WorkoutType::Cycling => "cycling",
        }
    }

    /// Capitalized display label.
    pub fn label(&self) -> &'static str {
        match self {
            WorkoutType::Running => "Running",
            WorkoutType::Cycling => "Cycling",
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutType {
    type Err = WorkoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "running" => Ok(WorkoutType::Running),
            "cycling" => Ok(WorkoutType::Cycling),
            other => Err(WorkoutError::UnknownType(other.to_string())),
        }
    }
}

/// Variant payload of a workout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkoutKind {
    /// Cadence in steps/min
    Running { cadence: f64 },
    /// Elevation gain in meters, may be negative
    Cycling { elevation_gain: f64 },
}

impl WorkoutKind {
    /// Discriminant of this payload.
    pub fn workout_type(&self) -> WorkoutType {
        match self {
            WorkoutKind::Running { .. } => WorkoutType::Running,
            WorkoutKind::Cycling { .. } => WorkoutType::Cycling,
        }
    }

    /// Build the payload for `workout_type` from the form's extra value.
    pub fn from_type(workout_type: WorkoutType, extra: f64) -> Self {
        match workout_type {
            WorkoutType::Running => WorkoutKind::Running { cadence: extra },
            WorkoutType::Cycling => WorkoutKind::Cycling {
                elevation_gain: extra,
            },
        }
    }

    fn validate(&self) -> Result<(), WorkoutError> {
        match *self {
            WorkoutKind::Running { cadence } => require_positive("cadence", cadence),
            // Elevation is only checked for finiteness; downhill rides are negative.
            WorkoutKind::Cycling { elevation_gain } => require_finite("elevation gain", elevation_gain),
        }
    }
}

/// Workout validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkoutError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must be greater than 0, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("Unknown workout type: {0}")]
    UnknownType(String),
}

fn require_finite(field: &'static str, value: f64) -> Result<(), WorkoutError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(WorkoutError::NotFinite { field, value })
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), WorkoutError> {
    require_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(WorkoutError::NotPositive { field, value })
    }
}

fn validate_fields(distance: f64, duration: f64, kind: &WorkoutKind) -> Result<(), WorkoutError> {
    require_positive("distance", distance)?;
    require_positive("duration", duration)?;
    kind.validate()
}

/// New values for an in-place edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutEdit {
    /// Distance in km
    pub distance: f64,
    /// Duration in minutes
    pub duration: f64,
    /// Variant payload, may switch the workout type
    pub kind: WorkoutKind,
}

/// A single logged exercise session.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: WorkoutId,
    created_at: DateTime<Utc>,
    coords: Coords,
    distance: f64,
    duration: f64,
    kind: WorkoutKind,
    description: String,
}

impl Workout {
    /// Create a validated workout.
    pub fn new(
        id: WorkoutId,
        created_at: DateTime<Utc>,
        coords: Coords,
        distance: f64,
        duration: f64,
        kind: WorkoutKind,
    ) -> Result<Self, WorkoutError> {
        validate_fields(distance, duration, &kind)?;

        let mut workout = Self {
            id,
            created_at,
            coords,
            distance,
            duration,
            kind,
            description: String::new(),
        };
        workout.refresh_description();
        Ok(workout)
    }

    /// Create a running workout stamped with the current time.
    pub fn running(
        id: WorkoutId,
        coords: Coords,
        distance: f64,
        duration: f64,
        cadence: f64,
    ) -> Result<Self, WorkoutError> {
        Self::new(
            id,
            Utc::now(),
            coords,
            distance,
            duration,
            WorkoutKind::Running { cadence },
        )
    }

    /// Create a cycling workout stamped with the current time.
    pub fn cycling(
        id: WorkoutId,
        coords: Coords,
        distance: f64,
        duration: f64,
        elevation_gain: f64,
    ) -> Result<Self, WorkoutError> {
        Self::new(
            id,
            Utc::now(),
            coords,
            distance,
            duration,
            WorkoutKind::Cycling { elevation_gain },
        )
    }

    pub fn id(&self) -> WorkoutId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    /// Distance in km.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Duration in minutes.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn kind(&self) -> WorkoutKind {
        self.kind
    }

    pub fn workout_type(&self) -> WorkoutType {
        self.kind.workout_type()
    }

    /// Human readable title, e.g. "Running on April 14".
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Cadence in steps/min (running only).
    pub fn cadence(&self) -> Option<f64> {
        match self.kind {
            WorkoutKind::Running { cadence } => Some(cadence),
            WorkoutKind::Cycling { .. } => None,
        }
    }

    /// Elevation gain in meters (cycling only).
    pub fn elevation_gain(&self) -> Option<f64> {
        match self.kind {
            WorkoutKind::Running { .. } => None,
            WorkoutKind::Cycling { elevation_gain } => Some(elevation_gain),
        }
    }

    /// Pace in min/km, truncated toward zero (running only).
    pub fn pace(&self) -> Option<u32> {
        match self.kind {
            WorkoutKind::Running { .. } => Some((self.duration / self.distance).trunc() as u32),
            WorkoutKind::Cycling { .. } => None,
        }
    }

    /// Speed in km/h, truncated toward zero (cycling only).
    pub fn speed(&self) -> Option<u32> {
        match self.kind {
            WorkoutKind::Running { .. } => None,
            WorkoutKind::Cycling { .. } => {
                // Kilometres over hours, not the raw distance/duration ratio
                let hours = self.duration / MINUTES_PER_HOUR;
                Some((self.distance / hours).trunc() as u32)
            }
        }
    }

    /// Apply an edit in place.
    ///
    /// The edit is validated with the construction rules first; on failure
    /// the workout is left untouched. Identity, location and creation time
    /// never change.
    pub fn edit(&mut self, edit: WorkoutEdit) -> Result<(), WorkoutError> {
        validate_fields(edit.distance, edit.duration, &edit.kind)?;

        self.distance = edit.distance;
        self.duration = edit.duration;
        self.kind = edit.kind;
        self.refresh_description();
        Ok(())
    }

    fn refresh_description(&mut self) {
        let local = self.created_at.with_timezone(&Local);
        self.description = format!(
            "{} on {}",
            self.workout_type().label(),
            local.format("%B %-d")
        );
    }
}
