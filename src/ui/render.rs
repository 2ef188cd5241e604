//! Projection of the workout store onto the list and the map.
//!
//! Rendering is a pure function of the store: the list is rebuilt from
//! scratch on every call, so calling it twice on the same store yields the
//! same output.

use std::fmt::Write as _;

use crate::map::{MapWidget, MarkerRegistry, Popup};
use crate::workouts::{Workout, WorkoutId, WorkoutType};

/// A semantic action offered by a list entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListAction {
    /// Clicked the entry body, recenter the map on it
    Select(WorkoutId),
    Edit(WorkoutId),
    Delete(WorkoutId),
}

impl ListAction {
    pub fn workout_id(&self) -> WorkoutId {
        match *self {
            ListAction::Select(id) | ListAction::Edit(id) | ListAction::Delete(id) => id,
        }
    }

    /// Name used for the `data-action` attribute.
    pub fn name(&self) -> &'static str {
        match self {
            ListAction::Select(_) => "select",
            ListAction::Edit(_) => "edit",
            ListAction::Delete(_) => "delete",
        }
    }
}

/// One metric shown on a list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
    pub icon: &'static str,
    pub value: String,
    pub unit: &'static str,
}

/// Render model of one workout in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub id: WorkoutId,
    pub workout_type: WorkoutType,
    pub title: String,
    pub details: Vec<Detail>,
    /// Select, edit, delete
    pub actions: [ListAction; 3],
}

impl ListEntry {
    pub fn from_workout(workout: &Workout) -> Self {
        let id = workout.id();
        let workout_type = workout.workout_type();

        let icon = match workout_type {
            WorkoutType::Running => "🏃‍♂️",
            WorkoutType::Cycling => "🚴‍♀️",
        };

        let mut details = vec![
            Detail {
                icon,
                value: workout.distance().to_string(),
                unit: "km",
            },
            Detail {
                icon: "⏱",
                value: workout.duration().to_string(),
                unit: "min",
            },
        ];

        match workout_type {
            WorkoutType::Running => {
                details.push(Detail {
                    icon: "⚡️",
                    value: optional_value(workout.pace()),
                    unit: "min/km",
                });
                details.push(Detail {
                    icon: "🦶🏼",
                    value: optional_value(workout.cadence()),
                    unit: "spm",
                });
            }
            WorkoutType::Cycling => {
                details.push(Detail {
                    icon: "⚡️",
                    value: optional_value(workout.speed()),
                    unit: "km/h",
                });
                details.push(Detail {
                    icon: "⛰",
                    value: optional_value(workout.elevation_gain()),
                    unit: "m",
                });
            }
        }

        Self {
            id,
            workout_type,
            title: workout.description().to_string(),
            details,
            actions: [
                ListAction::Select(id),
                ListAction::Edit(id),
                ListAction::Delete(id),
            ],
        }
    }

    /// Markup for this entry.
    pub fn to_markup(&self) -> String {
        let mut html = String::new();
        let kind = self.workout_type.as_str();

        let _ = writeln!(
            html,
            r#"<li class="workout workout--{kind}" data-id="{}" data-action="select">"#,
            self.id
        );
        let _ = writeln!(
            html,
            r#"  <h2 class="workout__title">{}</h2>"#,
            escape_html(&self.title)
        );
        for detail in &self.details {
            let _ = writeln!(html, r#"  <div class="workout__details">"#);
            let _ = writeln!(html, r#"    <span class="workout__icon">{}</span>"#, detail.icon);
            let _ = writeln!(
                html,
                r#"    <span class="workout__value">{}</span>"#,
                escape_html(&detail.value)
            );
            let _ = writeln!(html, r#"    <span class="workout__unit">{}</span>"#, detail.unit);
            let _ = writeln!(html, "  </div>");
        }
        let _ = writeln!(
            html,
            r#"  <button class="btn btn-edit" data-action="edit">Edit</button>"#
        );
        let _ = writeln!(
            html,
            r#"  <button class="btn btn-delete" data-action="delete">Delete</button>"#
        );
        html.push_str("</li>\n");

        html
    }
}

fn optional_value<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Full list output: markup plus the per-entry action bindings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedList {
    pub markup: String,
    pub entries: Vec<ListEntry>,
}

impl RenderedList {
    /// Find the action bound to `name` on the entry for `id`.
    pub fn action(&self, id: WorkoutId, name: &str) -> Option<ListAction> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .and_then(|entry| entry.actions.iter().copied().find(|a| a.name() == name))
    }
}

/// Rebuild the list in store order.
pub fn render_list(workouts: &[Workout]) -> RenderedList {
    let entries: Vec<ListEntry> = workouts.iter().map(ListEntry::from_workout).collect();
    let markup = entries.iter().map(ListEntry::to_markup).collect();

    tracing::debug!("Rendered {} list entries", entries.len());
    RenderedList { markup, entries }
}

/// Popup shown on a workout's marker.
pub fn popup(workout: &Workout) -> Popup {
    Popup {
        content: workout.description().to_string(),
        class_name: format!("{}-popup", workout.workout_type()),
    }
}

/// Place a marker for `workout` and register it under the workout id.
///
/// A marker already registered for the same id is removed from the map first.
pub fn place_marker<M: MapWidget>(
    map: &mut M,
    registry: &mut MarkerRegistry<M::Marker>,
    workout: &Workout,
) {
    let marker = map.add_marker(workout.coords(), &popup(workout));
    if let Some(previous) = registry.put(workout.id(), marker) {
        map.remove_marker(previous);
    }
}

/// Remove the marker for `id` from the map and the registry.
pub fn remove_marker<M: MapWidget>(
    map: &mut M,
    registry: &mut MarkerRegistry<M::Marker>,
    id: WorkoutId,
) -> bool {
    match registry.remove(id) {
        Some(marker) => {
            map.remove_marker(marker);
            true
        }
        None => false,
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
