mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::HdCurveApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional readings file to open on start-up.
    let preload = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "H&D Curve – Characteristic Curve Plotter",
        options,
        Box::new(move |_cc| {
            let mut app = HdCurveApp::default();
            if let Some(path) = &preload {
                ui::panels::load_path(&mut app.state, path);
            }
            Ok(Box::new(app))
        }),
    )
}
