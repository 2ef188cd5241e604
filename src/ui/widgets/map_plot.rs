//! Map widget drawn with egui_plot.
//!
//! Longitude runs along X and latitude along Y. Markers are plot points
//! with their popup text pinned above them.

use std::collections::BTreeMap;

use egui::{Align2, Ui};
use egui_plot::{Plot, PlotBounds, PlotPoint, Points, Text};

use crate::map::{MapWidget, Popup};
use crate::ui::theme::workout_color;
use crate::workouts::{Coords, WorkoutType};

/// Marker handle issued by [`PlotMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(u64);

#[derive(Debug, Clone)]
struct PlotMarker {
    coords: Coords,
    popup: Popup,
}

/// Plot-backed map.
#[derive(Debug, Default)]
pub struct PlotMap {
    center: Option<Coords>,
    zoom: u8,
    markers: BTreeMap<MarkerHandle, PlotMarker>,
    next_handle: u64,
    /// Bounds must be pushed to the plot on the next frame
    recenter: bool,
}

impl PlotMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn center(&self) -> Option<Coords> {
        self.center
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Visible degrees of longitude at a zoom level, like a web map tile pyramid.
    fn span_for_zoom(zoom: u8) -> f64 {
        360.0 / 2f64.powi(i32::from(zoom.min(20)))
    }

    /// Draw the map. Returns the coordinates of a click, if any.
    pub fn show(&mut self, ui: &mut Ui) -> Option<Coords> {
        let Some(center) = self.center else {
            ui.centered_and_justified(|ui| {
                ui.label("Waiting for your location...");
            });
            return None;
        };

        let recenter = std::mem::take(&mut self.recenter);
        let half_span = Self::span_for_zoom(self.zoom) / 2.0;
        let markers = &self.markers;

        let response = Plot::new("workout_map")
            .allow_double_click_reset(false)
            .show_x(true)
            .show_y(true)
            .x_axis_label("Longitude")
            .y_axis_label("Latitude")
            .show(ui, |plot_ui| {
                if recenter {
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                        [center.lng - half_span, center.lat - half_span / 2.0],
                        [center.lng + half_span, center.lat + half_span / 2.0],
                    ));
                }

                for marker in markers.values() {
                    let position = [marker.coords.lng, marker.coords.lat];
                    plot_ui.points(
                        Points::new(marker.popup.class_name.clone(), vec![position])
                            .radius(6.0)
                            .color(marker_color(&marker.popup)),
                    );
                    plot_ui.text(
                        Text::new(
                            marker.popup.class_name.clone(),
                            PlotPoint::new(position[0], position[1]),
                            marker.popup.content.clone(),
                        )
                        .anchor(Align2::CENTER_BOTTOM),
                    );
                }

                if plot_ui.response().clicked() {
                    plot_ui.pointer_coordinate()
                } else {
                    None
                }
            });

        response.inner.map(|point| Coords::new(point.y, point.x))
    }
}

/// Popup classes are `<type>-popup`.
fn marker_color(popup: &Popup) -> egui::Color32 {
    let workout_type = popup
        .class_name
        .strip_suffix("-popup")
        .and_then(|t| t.parse::<WorkoutType>().ok())
        .unwrap_or(WorkoutType::Running);
    workout_color(workout_type)
}

impl MapWidget for PlotMap {
    type Marker = MarkerHandle;

    fn set_view(&mut self, center: Coords, zoom: u8) {
        self.center = Some(center);
        self.zoom = zoom;
        self.recenter = true;
    }

    fn fly_to(&mut self, center: Coords, zoom: u8) {
        self.set_view(center, zoom);
    }

    fn add_marker(&mut self, coords: Coords, popup: &Popup) -> MarkerHandle {
        self.next_handle += 1;
        let handle = MarkerHandle(self.next_handle);
        self.markers.insert(
            handle,
            PlotMarker {
                coords,
                popup: popup.clone(),
            },
        );
        handle
    }

    fn remove_marker(&mut self, marker: MarkerHandle) {
        self.markers.remove(&marker);
    }
}
