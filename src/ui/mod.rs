//! Form state, list rendering and the egui host widgets.

pub mod form;
pub mod render;
pub mod theme;
pub mod viewport;
pub mod widgets;

pub use form::{ExtraField, FormController, FormInput, FormState};
pub use render::{render_list, ListAction, ListEntry, RenderedList};
pub use viewport::Viewport;
