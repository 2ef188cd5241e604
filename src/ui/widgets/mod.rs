//! egui widgets for the desktop host.

pub mod map_plot;
pub mod workout_panel;

pub use map_plot::{MarkerHandle, PlotMap};
pub use workout_panel::WorkoutPanel;
