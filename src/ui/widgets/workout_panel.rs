//! Side panel with the workout form and list.
//!
//! Implements [`Viewport`] for the desktop host. The controller pushes form
//! and list state in; [`WorkoutPanel::show`] draws it and hands user input
//! back as [`AppEvent`]s.

use egui::{RichText, ScrollArea, Ui};

use crate::controller::AppEvent;
use crate::ui::form::{ExtraField, FormController, FormInput, FormState};
use crate::ui::render::{ListAction, ListEntry, RenderedList};
use crate::ui::theme::workout_color;
use crate::ui::Viewport;
use crate::workouts::WorkoutType;

/// Desktop viewport state.
#[derive(Debug)]
pub struct WorkoutPanel {
    form_visible: bool,
    editing: bool,
    draft: FormInput,
    extra_field: ExtraField,
    entries: Vec<ListEntry>,
}

impl Default for WorkoutPanel {
    fn default() -> Self {
        Self {
            form_visible: false,
            editing: false,
            draft: FormInput::default(),
            extra_field: ExtraField::Cadence,
            entries: Vec::new(),
        }
    }
}

impl WorkoutPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the panel and collect the events the user triggered.
    pub fn show(&mut self, ui: &mut Ui) -> Vec<AppEvent> {
        let mut events = Vec::new();

        ui.heading("Workouts");
        ui.separator();

        if self.form_visible {
            self.render_form(ui, &mut events);
            ui.separator();
        } else if self.entries.is_empty() {
            ui.label(RichText::new("Click on the map to log a workout").weak());
        }

        ScrollArea::vertical().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            for entry in &self.entries {
                if let Some(action) = render_entry(ui, entry) {
                    events.push(AppEvent::List(action));
                }
                ui.add_space(4.0);
            }
        });

        events
    }

    fn render_form(&mut self, ui: &mut Ui, events: &mut Vec<AppEvent>) {
        ui.label(if self.editing { "Edit workout" } else { "New workout" });

        egui::Grid::new("workout_form")
            .num_columns(2)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                ui.label("Type");
                let before = self.draft.workout_type;
                egui::ComboBox::from_id_salt("workout_type")
                    .selected_text(before.label())
                    .show_ui(ui, |ui| {
                        for workout_type in WorkoutType::ALL {
                            ui.selectable_value(
                                &mut self.draft.workout_type,
                                workout_type,
                                workout_type.label(),
                            );
                        }
                    });
                if self.draft.workout_type != before {
                    events.push(AppEvent::TypeChanged(self.draft.workout_type));
                }
                ui.end_row();

                ui.label("Distance");
                ui.text_edit_singleline(&mut self.draft.distance)
                    .on_hover_text("km");
                ui.end_row();

                ui.label("Duration");
                ui.text_edit_singleline(&mut self.draft.duration)
                    .on_hover_text("min");
                ui.end_row();

                match self.extra_field {
                    ExtraField::Cadence => {
                        ui.label("Cadence");
                        ui.text_edit_singleline(&mut self.draft.cadence)
                            .on_hover_text("step/min");
                    }
                    ExtraField::Elevation => {
                        ui.label("Elev Gain");
                        ui.text_edit_singleline(&mut self.draft.elevation)
                            .on_hover_text("meters");
                    }
                }
                ui.end_row();
            });

        ui.horizontal(|ui| {
            let submitted = ui.button("OK").clicked()
                || ui.input(|i| i.key_pressed(egui::Key::Enter));
            if submitted {
                events.push(AppEvent::Submit(self.draft.clone()));
            }
            if ui.button("Cancel").clicked() || ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                events.push(AppEvent::CancelForm);
            }
        });
    }
}

/// Draw one list entry. Returns the action the user picked, if any.
fn render_entry(ui: &mut Ui, entry: &ListEntry) -> Option<ListAction> {
    let [select, edit, delete] = entry.actions;
    let color = workout_color(entry.workout_type);

    let mut picked = None;
    let frame = egui::Frame::group(ui.style()).stroke(egui::Stroke::new(1.0, color));
    frame.show(ui, |ui| {
        let title = egui::Label::new(RichText::new(&entry.title).strong().color(color))
            .sense(egui::Sense::click());
        if ui.add(title).on_hover_text("Show on map").clicked() {
            picked = Some(select);
        }
        ui.horizontal_wrapped(|ui| {
            for detail in &entry.details {
                ui.label(format!("{} {} {}", detail.icon, detail.value, detail.unit));
            }
        });
        ui.horizontal(|ui| {
            if ui.button("Edit").clicked() {
                picked = Some(edit);
            }
            if ui.button("Delete").clicked() {
                picked = Some(delete);
            }
        });
    });

    picked
}

impl Viewport for WorkoutPanel {
    fn show_form(&mut self, form: &FormController) {
        self.form_visible = true;
        self.editing = matches!(form.state(), FormState::Editing { .. });
        self.draft = form.values().clone();
        self.extra_field = form.extra_field();
    }

    fn hide_form(&mut self) {
        self.form_visible = false;
        self.editing = false;
        self.draft = FormInput {
            workout_type: self.draft.workout_type,
            ..Default::default()
        };
    }

    fn show_extra_field(&mut self, field: ExtraField) {
        self.extra_field = field;
    }

    fn render_list(&mut self, list: &RenderedList) {
        self.entries = list.entries.clone();
    }

    fn alert(&mut self, message: &str) {
        rfd::MessageDialog::new()
            .set_title("Mapty")
            .set_description(message)
            .set_level(rfd::MessageLevel::Info)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }

    fn confirm(&mut self, message: &str) -> bool {
        let answer = rfd::MessageDialog::new()
            .set_title("Mapty")
            .set_description(message)
            .set_level(rfd::MessageLevel::Warning)
            .set_buttons(rfd::MessageButtons::YesNo)
            .show();
        matches!(answer, rfd::MessageDialogResult::Yes)
    }
}
