//! Mapty - map-based workout logger
//!
//! Main entry point for the desktop application.

use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Mapty v{}", env!("CARGO_PKG_VERSION"));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 760.0])
            .with_min_inner_size([720.0, 480.0])
            .with_title("Mapty"),
        ..Default::default()
    };

    eframe::run_native(
        "Mapty",
        options,
        Box::new(|cc| Ok(Box::new(app::MaptyApp::new(cc)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))
}
