//! Main application state and UI logic.

use crossbeam::channel::{bounded, Receiver};
use eframe::egui;

use mapty::controller::{AppController, AppEvent, MapState};
use mapty::map::{FixedLocation, Geolocation, GeolocationError};
use mapty::storage::config::{self, AppConfig};
use mapty::storage::{open_slot, MemorySlot, StorageSlot, WorkoutPersistence};
use mapty::ui::theme;
use mapty::ui::widgets::{PlotMap, WorkoutPanel};
use mapty::workouts::Coords;

type Controller = AppController<PlotMap, WorkoutPanel, Box<dyn StorageSlot>>;

/// Main application state.
pub struct MaptyApp {
    controller: Controller,
    /// Pending geolocation result, taken once
    position_rx: Option<Receiver<Result<Coords, GeolocationError>>>,
}

impl MaptyApp {
    /// Create a new application instance.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = config::load_config().unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            AppConfig::default()
        });

        cc.egui_ctx.set_visuals(theme::visuals());

        let slot = open_slot(&config).unwrap_or_else(|e| {
            tracing::error!("Failed to open workout storage, changes will not be kept: {}", e);
            Box::new(MemorySlot::new()) as Box<dyn StorageSlot>
        });

        let mut controller = AppController::new(
            PlotMap::new(),
            WorkoutPanel::new(),
            WorkoutPersistence::new(slot),
            config.map.zoom,
        );
        controller.startup();

        let position_rx = spawn_geolocation(FixedLocation::new(config.map.home), cc.egui_ctx.clone());

        Self {
            controller,
            position_rx: Some(position_rx),
        }
    }

    /// Deliver the geolocation result once it arrives.
    fn poll_position(&mut self) {
        let Some(rx) = &self.position_rx else {
            return;
        };

        if let Ok(result) = rx.try_recv() {
            self.position_rx = None;
            self.controller.handle(AppEvent::PositionResolved(result));
        }
    }
}

/// Resolve the position off the UI thread.
fn spawn_geolocation<G>(locator: G, ctx: egui::Context) -> Receiver<Result<Coords, GeolocationError>>
where
    G: Geolocation + 'static,
{
    let (tx, rx) = bounded(1);
    std::thread::spawn(move || {
        let result = locator.current_position();
        if tx.send(result).is_err() {
            tracing::debug!("Position result dropped, app is closing");
        }
        ctx.request_repaint();
    });
    rx
}

impl eframe::App for MaptyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_position();

        if self.controller.map_state() == MapState::Pending {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        let mut events = Vec::new();

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            let map = self.controller.map();
            ui.horizontal(|ui| {
                match map.center() {
                    Some(center) => ui.label(format!("{:.4}, {:.4}", center.lat, center.lng)),
                    None => ui.label("Locating..."),
                };
                ui.separator();
                ui.label(format!("{} markers", map.marker_count()));
            });
        });

        egui::SidePanel::left("workouts")
            .resizable(true)
            .default_width(360.0)
            .min_width(280.0)
            .show(ctx, |ui| {
                events.extend(self.controller.viewport_mut().show(ui));
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.controller.map_state() == MapState::Failed {
                ui.centered_and_justified(|ui| {
                    ui.label("Map unavailable: could not get your position");
                });
                return;
            }
            if let Some(location) = self.controller.map_mut().show(ui) {
                events.push(AppEvent::MapClick(location));
            }
        });

        for event in events {
            self.controller.handle(event);
        }
    }
}
