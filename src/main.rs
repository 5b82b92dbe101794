mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::VfdViewerApp;
use config::ViewerConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = ViewerConfig::discover();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "VFD Log Viewer",
        options,
        Box::new(move |_cc| Ok(Box::new(VfdViewerApp::new(config)))),
    )
}
