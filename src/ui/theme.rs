//! Colors and egui visuals for the desktop host.

use egui::{Color32, Visuals};

use crate::workouts::WorkoutType;

/// Application palette.
pub struct Palette;

impl Palette {
    /// Cycling accent (orange)
    pub const BRAND_CYCLING: Color32 = Color32::from_rgb(0xff, 0xb5, 0x45);
    /// Running accent (green)
    pub const BRAND_RUNNING: Color32 = Color32::from_rgb(0x00, 0xc4, 0x6a);
    /// Sidebar background
    pub const DARK_1: Color32 = Color32::from_rgb(0x2d, 0x34, 0x39);
    /// Cards and inputs
    pub const DARK_2: Color32 = Color32::from_rgb(0x42, 0x48, 0x4d);
    pub const LIGHT_1: Color32 = Color32::from_rgb(0xaa, 0xaa, 0xaa);
    pub const LIGHT_2: Color32 = Color32::from_rgb(0xec, 0xec, 0xec);
    pub const LIGHT_3: Color32 = Color32::from_rgb(0xd6, 0xde, 0xe0);
}

/// Accent color for a workout type.
pub fn workout_color(workout_type: WorkoutType) -> Color32 {
    match workout_type {
        WorkoutType::Running => Palette::BRAND_RUNNING,
        WorkoutType::Cycling => Palette::BRAND_CYCLING,
    }
}

/// Dark visuals built on the palette.
pub fn visuals() -> Visuals {
    let mut visuals = Visuals::dark();

    visuals.window_fill = Palette::DARK_1;
    visuals.panel_fill = Palette::DARK_1;
    visuals.faint_bg_color = Palette::DARK_2;
    visuals.extreme_bg_color = Palette::LIGHT_3;

    visuals.widgets.noninteractive.bg_fill = Palette::DARK_2;
    visuals.widgets.inactive.bg_fill = Palette::DARK_2;
    visuals.widgets.hovered.bg_fill = Palette::DARK_2.gamma_multiply(1.3);
    visuals.widgets.active.bg_fill = Palette::BRAND_RUNNING;

    visuals.selection.bg_fill = Palette::BRAND_RUNNING.linear_multiply(0.4);
    visuals.selection.stroke.color = Palette::BRAND_RUNNING;

    visuals.widgets.noninteractive.fg_stroke.color = Palette::LIGHT_2;
    visuals.widgets.inactive.fg_stroke.color = Palette::LIGHT_1;
    visuals.widgets.hovered.fg_stroke.color = Palette::LIGHT_2;
    visuals.widgets.active.fg_stroke.color = Palette::LIGHT_2;

    visuals
}
