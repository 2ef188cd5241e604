//! Output surface the controller drives.

use super::form::{ExtraField, FormController};
use super::render::RenderedList;

/// Everything the controller shows to the user besides the map.
///
/// `alert` and `confirm` are modal: they return only once the user has
/// answered, and the controller handles no other event in the meantime.
pub trait Viewport {
    /// Show the form in its current mode with its current values.
    fn show_form(&mut self, form: &FormController);

    fn hide_form(&mut self);

    /// Swap the sport-specific input row.
    fn show_extra_field(&mut self, field: ExtraField);

    /// Replace the list with a fresh render.
    fn render_list(&mut self, list: &RenderedList);

    fn alert(&mut self, message: &str);

    /// Ask a yes/no question.
    fn confirm(&mut self, message: &str) -> bool;
}
