mod app;
mod busy;
mod config;
mod data;
mod downloader;
mod error;
mod preferences;
mod state;
mod ui;

use app::PcaApp;
use config::AppPaths;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Consulta PCA",
        options,
        Box::new(|_cc| Ok(Box::new(PcaApp::new(AppPaths::default())))),
    )
}
