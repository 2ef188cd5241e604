//! Application controller.
//!
//! Orchestrates the workout store, the marker registry, the form and
//! persistence in response to user events. Every mutation follows the same
//! path: change the store and markers, persist the whole store, redraw the
//! list.

use chrono::Utc;

use crate::map::{GeolocationError, MapWidget, MarkerRegistry};
use crate::storage::{StorageError, StorageSlot, WorkoutPersistence};
use crate::ui::form::{FormController, FormInput, FormState};
use crate::ui::render::{self, ListAction};
use crate::ui::Viewport;
use crate::workouts::{Coords, Workout, WorkoutId, WorkoutStore, WorkoutType};

pub const MSG_ADDED: &str = "New workout added!";
pub const MSG_UPDATED: &str = "Workouts updated successfully.";
pub const MSG_INVALID_INPUT: &str = "Input must be a number or greater than 0.";
pub const MSG_NO_POSITION: &str = "Could not get your position";
pub const MSG_CONFIRM_DELETE: &str = "Are you sure you want to delete this workout?";

/// Whether the map can take map-dependent events yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapState {
    /// Waiting for the geolocation result
    #[default]
    Pending,
    Ready,
    /// Geolocation failed, the map stays uninitialized
    Failed,
}

/// User and system events the controller reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    PositionResolved(Result<Coords, GeolocationError>),
    MapClick(Coords),
    List(ListAction),
    Submit(FormInput),
    CancelForm,
    TypeChanged(WorkoutType),
}

/// Workout lifecycle and view synchronization.
pub struct AppController<M: MapWidget, V, S> {
    store: WorkoutStore,
    markers: MarkerRegistry<M::Marker>,
    form: FormController,
    persistence: WorkoutPersistence<S>,
    map: M,
    viewport: V,
    map_state: MapState,
    zoom: u8,
    last_save_error: Option<StorageError>,
}

impl<M, V, S> AppController<M, V, S>
where
    M: MapWidget,
    V: Viewport,
    S: StorageSlot,
{
    pub fn new(map: M, viewport: V, persistence: WorkoutPersistence<S>, zoom: u8) -> Self {
        Self {
            store: WorkoutStore::new(),
            markers: MarkerRegistry::new(),
            form: FormController::new(),
            persistence,
            map,
            viewport,
            map_state: MapState::Pending,
            zoom,
            last_save_error: None,
        }
    }

    /// Hydrate the store from storage and draw the list.
    ///
    /// Markers are placed once the map becomes ready.
    pub fn startup(&mut self) {
        let workouts = self.persistence.load();
        self.store.replace_all(workouts);
        self.viewport.hide_form();
        self.render();

        tracing::info!("Started with {} workouts", self.store.len());
    }

    /// Dispatch a single event.
    pub fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::PositionResolved(result) => self.position_resolved(result),
            AppEvent::MapClick(location) => self.map_click(location),
            AppEvent::List(action) => self.list_action(action),
            AppEvent::Submit(input) => self.submit(input),
            AppEvent::CancelForm => self.cancel_form(),
            AppEvent::TypeChanged(workout_type) => self.change_type(workout_type),
        }
    }

    /// Initialize the map at the user's position, or report the failure.
    pub fn position_resolved(&mut self, result: Result<Coords, GeolocationError>) {
        if self.map_state == MapState::Ready {
            tracing::debug!("Ignoring repeated position result");
            return;
        }

        match result {
            Ok(position) => {
                self.map.set_view(position, self.zoom);
                self.map_state = MapState::Ready;

                for workout in self.store.all() {
                    render::place_marker(&mut self.map, &mut self.markers, workout);
                }
                tracing::info!(
                    "Map ready at {:.4},{:.4} with {} markers",
                    position.lat,
                    position.lng,
                    self.markers.len()
                );
            }
            Err(e) => {
                tracing::warn!("Geolocation failed: {}", e);
                self.map_state = MapState::Failed;
                self.viewport.alert(MSG_NO_POSITION);
            }
        }
    }

    /// Open the form in add mode at the clicked location.
    pub fn map_click(&mut self, location: Coords) {
        if !self.is_map_ready() {
            tracing::debug!("Map click before map is ready");
            return;
        }

        if self.form.is_visible() {
            tracing::debug!("Map click replaces open form ({:?})", self.form.state());
        }
        self.form.open_add(location);
        self.viewport.show_form(&self.form);
        self.viewport.show_extra_field(self.form.extra_field());
    }

    pub fn list_action(&mut self, action: ListAction) {
        tracing::debug!("List {} for workout {}", action.name(), action.workout_id());
        match action {
            ListAction::Select(id) => self.select(id),
            ListAction::Edit(id) => self.begin_edit(id),
            ListAction::Delete(id) => self.request_delete(id),
        }
    }

    /// Recenter the map on a workout.
    pub fn select(&mut self, id: WorkoutId) {
        if !self.is_map_ready() {
            return;
        }

        match self.store.find_by_id(id) {
            Some(workout) => self.map.fly_to(workout.coords(), self.zoom),
            None => tracing::debug!("Select for unknown workout {}", id),
        }
    }

    /// Open the form in edit mode for `id`.
    pub fn begin_edit(&mut self, id: WorkoutId) {
        let Some(workout) = self.store.find_by_id(id) else {
            tracing::debug!("Edit for unknown workout {}", id);
            return;
        };

        self.form.open_edit(workout);
        self.viewport.show_form(&self.form);
        self.viewport.show_extra_field(self.form.extra_field());
    }

    /// Ask for confirmation, then delete `id`.
    pub fn request_delete(&mut self, id: WorkoutId) {
        if !self.store.contains(id) {
            tracing::debug!("Delete for unknown workout {}", id);
            return;
        }

        if self.viewport.confirm(MSG_CONFIRM_DELETE) {
            self.delete(id);
        }
    }

    /// Delete `id` from the store and the map without asking.
    pub fn delete(&mut self, id: WorkoutId) {
        if !self.store.remove_by_id(id) {
            return;
        }
        render::remove_marker(&mut self.map, &mut self.markers, id);

        if self.form.editing_id() == Some(id) {
            self.close_form();
        }

        self.render();
        self.persist();

        tracing::info!("Deleted workout {}", id);
        self.viewport.alert(&format!("Deleted workout {}", id));
    }

    /// Commit the form in its current mode.
    pub fn submit(&mut self, input: FormInput) {
        match self.form.state() {
            FormState::Hidden => tracing::debug!("Submit while form is hidden"),
            FormState::Adding { location } => self.add_workout(location, &input),
            FormState::Editing { id } => self.update_workout(id, &input),
        }
    }

    pub fn cancel_form(&mut self) {
        self.close_form();
    }

    /// Swap the extra input row without touching the form state.
    pub fn change_type(&mut self, workout_type: WorkoutType) {
        self.form.select_type(workout_type);
        self.viewport.show_extra_field(self.form.extra_field());
    }

    fn add_workout(&mut self, location: Coords, input: &FormInput) {
        let edit = input.to_edit();
        let id = self.store.allocate_id();

        let workout = match Workout::new(id, Utc::now(), location, edit.distance, edit.duration, edit.kind) {
            Ok(workout) => workout,
            Err(e) => {
                tracing::debug!("Rejected new workout: {}", e);
                self.viewport.alert(MSG_INVALID_INPUT);
                return;
            }
        };

        if self.is_map_ready() {
            render::place_marker(&mut self.map, &mut self.markers, &workout);
        }
        if let Err(e) = self.store.add(workout) {
            tracing::error!("Failed to add workout: {}", e);
            render::remove_marker(&mut self.map, &mut self.markers, id);
            return;
        }

        self.close_form();
        self.render();
        self.persist();

        tracing::info!("Added workout {}", id);
        self.viewport.alert(MSG_ADDED);
    }

    fn update_workout(&mut self, id: WorkoutId, input: &FormInput) {
        let Some(workout) = self.store.find_by_id_mut(id) else {
            tracing::warn!("Edited workout {} no longer exists", id);
            self.close_form();
            return;
        };

        if let Err(e) = workout.edit(input.to_edit()) {
            tracing::debug!("Rejected edit of workout {}: {}", id, e);
            self.viewport.alert(MSG_INVALID_INPUT);
            return;
        }

        // Redraw the marker so its popup follows the new description
        if self.markers.contains(id) {
            if let Some(workout) = self.store.find_by_id(id) {
                render::place_marker(&mut self.map, &mut self.markers, workout);
            }
        }

        self.close_form();
        self.render();
        self.persist();

        tracing::info!("Updated workout {}", id);
        self.viewport.alert(MSG_UPDATED);
    }

    fn close_form(&mut self) {
        self.form.close();
        self.viewport.hide_form();
    }

    fn render(&mut self) {
        let list = render::render_list(self.store.all());
        self.viewport.render_list(&list);
    }

    fn persist(&mut self) {
        match self.persistence.save(self.store.all()) {
            Ok(()) => self.last_save_error = None,
            Err(e) => {
                // Not surfaced to the user; the next successful save catches up
                tracing::warn!("Failed to persist workouts: {}", e);
                self.last_save_error = Some(e);
            }
        }
    }

    pub fn is_map_ready(&self) -> bool {
        self.map_state == MapState::Ready
    }

    pub fn map_state(&self) -> MapState {
        self.map_state
    }

    pub fn store(&self) -> &WorkoutStore {
        &self.store
    }

    pub fn markers(&self) -> &MarkerRegistry<M::Marker> {
        &self.markers
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn persistence(&self) -> &WorkoutPersistence<S> {
        &self.persistence
    }

    /// Error from the most recent save, if it failed.
    pub fn last_save_error(&self) -> Option<&StorageError> {
        self.last_save_error.as_ref()
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }
}
