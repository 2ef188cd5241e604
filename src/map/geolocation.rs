//! Current-position lookup.

use thiserror::Error;

use crate::workouts::Coords;

/// One-shot current position query.
///
/// Implementations may block; hosts run them off the UI thread and deliver
/// the result to the controller as a single event.
pub trait Geolocation: Send {
    fn current_position(&self) -> Result<Coords, GeolocationError>;
}

/// Geolocation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Position unavailable: {0}")]
    Unavailable(String),
}

/// Reports a configured location, or unavailable when none is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation {
    position: Option<Coords>,
}

impl FixedLocation {
    pub fn new(position: Option<Coords>) -> Self {
        Self { position }
    }
}

impl Geolocation for FixedLocation {
    fn current_position(&self) -> Result<Coords, GeolocationError> {
        self.position.ok_or_else(|| {
            GeolocationError::Unavailable("no home location configured".to_string())
        })
    }
}
