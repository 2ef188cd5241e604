//! Map widget and geolocation collaborators.
//!
//! The map engine itself lives outside the crate. The controller only needs
//! the small surface below; click events are fed back in by the host as
//! [`crate::controller::AppEvent::MapClick`].

pub mod geolocation;
pub mod registry;

pub use geolocation::{FixedLocation, Geolocation, GeolocationError};
pub use registry::MarkerRegistry;

use crate::workouts::Coords;

/// Popup bound to a workout marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    /// Popup text (the workout description)
    pub content: String,
    /// Style class, `"<type>-popup"`
    pub class_name: String,
}

/// Interactive map surface.
pub trait MapWidget {
    /// Handle for a placed marker.
    type Marker;

    /// Initialize the view at `center`.
    fn set_view(&mut self, center: Coords, zoom: u8);

    /// Animate the view to `center`.
    fn fly_to(&mut self, center: Coords, zoom: u8);

    /// Place a marker with an open popup.
    fn add_marker(&mut self, coords: Coords, popup: &Popup) -> Self::Marker;

    /// Remove a previously placed marker.
    fn remove_marker(&mut self, marker: Self::Marker);
}
