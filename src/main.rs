mod app;
mod backend;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::LazConverterApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Falling back to default settings: {e:#}");
        AppConfig::default()
    });
    log::debug!("Using config {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([600.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "LAZ Converter – .laz to CSV / XYZ",
        options,
        Box::new(|_cc| Ok(Box::new(LazConverterApp::new(config)))),
    )
}
