mod app;
mod chart;
mod color;
mod config;
mod dashboard;
mod data;
mod kpi;
mod session;
mod ui;

use std::path::PathBuf;

use app::DashboardApp;
use config::DashboardConfig;
use eframe::egui;
use session::Source;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load();

    // Optional first argument: a workbook file or a folder of CSV files.
    let initial = std::env::args_os().nth(1).map(PathBuf::from).map(|path| {
        if path.is_dir() {
            Source::Directory(path)
        } else {
            Source::Workbook(path)
        }
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(&config, initial)))),
    )
}
