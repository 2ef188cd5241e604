//! Workout form state.
//!
//! The form is either hidden, open to add a workout at a clicked location,
//! or open to edit an existing workout. Field values are kept as the raw
//! text the user typed and only turned into numbers on submit.

use crate::workouts::{Coords, Workout, WorkoutEdit, WorkoutId, WorkoutKind, WorkoutType};

/// Form visibility and mode.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FormState {
    #[default]
    Hidden,
    /// Adding a workout at the clicked location
    Adding { location: Coords },
    /// Editing an existing workout
    Editing { id: WorkoutId },
}

/// The sport-specific input row currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraField {
    Cadence,
    Elevation,
}

impl ExtraField {
    pub fn for_type(workout_type: WorkoutType) -> Self {
        match workout_type {
            WorkoutType::Running => ExtraField::Cadence,
            WorkoutType::Cycling => ExtraField::Elevation,
        }
    }
}

/// Raw form field values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormInput {
    pub workout_type: WorkoutType,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

impl FormInput {
    /// Pre-fill from an existing workout.
    pub fn from_workout(workout: &Workout) -> Self {
        let mut input = Self {
            workout_type: workout.workout_type(),
            distance: workout.distance().to_string(),
            duration: workout.duration().to_string(),
            ..Default::default()
        };

        match workout.kind() {
            WorkoutKind::Running { cadence } => input.cadence = cadence.to_string(),
            WorkoutKind::Cycling { elevation_gain } => input.elevation = elevation_gain.to_string(),
        }

        input
    }

    /// Interpret the fields as numbers.
    ///
    /// Blank fields read as 0 and anything unparseable as NaN, so both are
    /// rejected by workout validation rather than here.
    pub fn to_edit(&self) -> WorkoutEdit {
        let extra = match self.workout_type {
            WorkoutType::Running => parse_number(&self.cadence),
            WorkoutType::Cycling => parse_number(&self.elevation),
        };

        WorkoutEdit {
            distance: parse_number(&self.distance),
            duration: parse_number(&self.duration),
            kind: WorkoutKind::from_type(self.workout_type, extra),
        }
    }
}

fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

/// Owns the transient form state.
#[derive(Debug, Clone, Default)]
pub struct FormController {
    state: FormState,
    values: FormInput,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open blank in add mode for a map click at `location`.
    pub fn open_add(&mut self, location: Coords) {
        self.values = FormInput {
            workout_type: self.values.workout_type,
            ..Default::default()
        };
        self.state = FormState::Adding { location };
    }

    /// Open in edit mode pre-filled from `workout`.
    pub fn open_edit(&mut self, workout: &Workout) {
        self.values = FormInput::from_workout(workout);
        self.state = FormState::Editing { id: workout.id() };
    }

    /// Hide the form and clear its fields.
    pub fn close(&mut self) {
        self.state = FormState::Hidden;
        self.values = FormInput {
            workout_type: self.values.workout_type,
            ..Default::default()
        };
    }

    /// Switch the type selector. Does not change the form state.
    pub fn select_type(&mut self, workout_type: WorkoutType) {
        self.values.workout_type = workout_type;
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state != FormState::Hidden
    }

    /// Id of the workout being edited, if in edit mode.
    pub fn editing_id(&self) -> Option<WorkoutId> {
        match self.state {
            FormState::Editing { id } => Some(id),
            _ => None,
        }
    }

    pub fn values(&self) -> &FormInput {
        &self.values
    }

    pub fn extra_field(&self) -> ExtraField {
        ExtraField::for_type(self.values.workout_type)
    }
}
