use std::path::PathBuf;

use eframe::egui;

use crate::color::ChartColors;
use crate::config::{DashboardConfig, Theme};
use crate::session::{Session, Source};
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub session: Session,
    pub colors: ChartColors,
    pub theme: Theme,
    /// Folder opened by "Open configured health folder".
    pub health_data_dir: PathBuf,
    /// Selected tab of tabbed dashboards.
    pub active_tab: usize,
    pub show_raw_data: bool,
}

impl DashboardApp {
    pub fn new(config: &DashboardConfig, initial: Option<Source>) -> Self {
        let mut session = Session::new(config.top_n);
        if let Some(source) = initial {
            session.open(source);
        }
        Self {
            session,
            colors: ChartColors::from_config(&config.palette),
            theme: config.theme,
            health_data_dir: config.health_data_dir.clone(),
            active_tab: 0,
            show_raw_data: false,
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(match self.theme {
            Theme::Dark => egui::Visuals::dark(),
            Theme::Light => egui::Visuals::light(),
        });

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, self);
        });

        // ---- Left side panel: settings ----
        egui::SidePanel::left("settings_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, self);
            });

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::central_panel(ui, self);
        });
    }
}
