//! Workout snapshot persistence.
//!
//! The whole store is serialized as one JSON array under the `workouts` key
//! and rewritten on every save. Records are plain data; loading rebuilds
//! full [`Workout`] values from the type tag, so derived metrics come back
//! with them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workouts::{Coords, Workout, WorkoutError, WorkoutId, WorkoutKind};

use super::slot::{StorageError, StorageSlot};

/// Storage key holding the workout snapshot.
pub const WORKOUTS_KEY: &str = "workouts";

/// Storage key holding raw records the last load could not restore.
pub const REJECTED_KEY: &str = "workouts_rejected";

/// Persisted form of a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    pub id: WorkoutId,
    /// Older snapshots stored the creation time under `date`
    #[serde(alias = "date")]
    pub created_at: DateTime<Utc>,
    pub coords: Coords,
    pub distance: f64,
    pub duration: f64,
    #[serde(flatten)]
    pub kind: KindRecord,
    #[serde(default)]
    pub description: String,
}

/// Variant fields of a persisted workout, tagged by `type`.
///
/// Derived metrics are written for readability and ignored on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum KindRecord {
    Running {
        cadence: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pace: Option<u32>,
    },
    Cycling {
        #[serde(rename = "elevationGain")]
        elevation_gain: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        speed: Option<u32>,
    },
}

impl From<&Workout> for WorkoutRecord {
    fn from(workout: &Workout) -> Self {
        let kind = match workout.kind() {
            WorkoutKind::Running { cadence } => KindRecord::Running {
                cadence,
                pace: workout.pace(),
            },
            WorkoutKind::Cycling { elevation_gain } => KindRecord::Cycling {
                elevation_gain,
                speed: workout.speed(),
            },
        };

        Self {
            id: workout.id(),
            created_at: workout.created_at(),
            coords: workout.coords(),
            distance: workout.distance(),
            duration: workout.duration(),
            kind,
            description: workout.description().to_string(),
        }
    }
}

impl TryFrom<WorkoutRecord> for Workout {
    type Error = WorkoutError;

    fn try_from(record: WorkoutRecord) -> Result<Self, Self::Error> {
        let kind = match record.kind {
            KindRecord::Running { cadence, .. } => WorkoutKind::Running { cadence },
            KindRecord::Cycling { elevation_gain, .. } => WorkoutKind::Cycling { elevation_gain },
        };

        Workout::new(
            record.id,
            record.created_at,
            record.coords,
            record.distance,
            record.duration,
            kind,
        )
    }
}

/// Saves and loads the workout snapshot through a [`StorageSlot`].
pub struct WorkoutPersistence<S> {
    slot: S,
}

impl<S: StorageSlot> WorkoutPersistence<S> {
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    /// Overwrite the snapshot with `workouts`.
    pub fn save(&mut self, workouts: &[Workout]) -> Result<(), StorageError> {
        let records: Vec<WorkoutRecord> = workouts.iter().map(WorkoutRecord::from).collect();
        let json = serde_json::to_string(&records)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        self.slot.write(WORKOUTS_KEY, &json)?;
        tracing::debug!("Saved {} workouts", records.len());
        Ok(())
    }

    /// Load the snapshot.
    ///
    /// An absent, unreadable or malformed snapshot loads as empty. Individual
    /// records that fail to parse or validate are skipped and copied verbatim
    /// under [`REJECTED_KEY`], since the next save drops them from the
    /// snapshot.
    pub fn load(&mut self) -> Vec<Workout> {
        let json = match self.slot.read(WORKOUTS_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read workout snapshot: {}", e);
                return Vec::new();
            }
        };

        let values: Vec<serde_json::Value> = match serde_json::from_str(&json) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!("Ignoring malformed workout snapshot: {}", e);
                return Vec::new();
            }
        };

        let mut workouts = Vec::with_capacity(values.len());
        let mut rejected = Vec::new();
        for value in values {
            let record: WorkoutRecord = match serde_json::from_value(value.clone()) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!("Skipping unreadable workout record {}: {}", value, e);
                    rejected.push(value);
                    continue;
                }
            };

            let id = record.id;
            match Workout::try_from(record) {
                Ok(workout) => workouts.push(workout),
                Err(e) => {
                    tracing::warn!("Skipping invalid workout {} {}: {}", id, value, e);
                    rejected.push(value);
                }
            }
        }

        if !rejected.is_empty() {
            self.keep_rejected(&rejected);
        }

        tracing::info!("Loaded {} workouts from storage", workouts.len());
        workouts
    }

    fn keep_rejected(&mut self, rejected: &[serde_json::Value]) {
        let result = serde_json::to_string(rejected)
            .map_err(|e| StorageError::SerializationError(e.to_string()))
            .and_then(|json| self.slot.write(REJECTED_KEY, &json));

        match result {
            Ok(()) => tracing::warn!(
                "Kept {} rejected workout records under {:?}",
                rejected.len(),
                REJECTED_KEY
            ),
            Err(e) => tracing::warn!("Failed to keep rejected workout records: {}", e),
        }
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn slot_mut(&mut self) -> &mut S {
        &mut self.slot
    }
}
