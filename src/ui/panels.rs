use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::app::DashboardApp;
use crate::color::ChartColors;
use crate::config::Theme;
use crate::dashboard::{DashboardKind, DashboardView};
use crate::data::model::Table;
use crate::session::Source;
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Left side panel – settings
// ---------------------------------------------------------------------------

/// Render the left settings panel.
pub fn side_panel(ui: &mut Ui, app: &mut DashboardApp) {
    ui.heading("Settings");
    ui.separator();

    ui.strong("Theme");
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut app.theme, Theme::Dark, "Dark");
        ui.selectable_value(&mut app.theme, Theme::Light, "Light");
    });
    ui.separator();

    ui.strong("Top N categories");
    let mut top_n = app.session.params.top_n;
    if ui.add(egui::Slider::new(&mut top_n, 1..=20)).changed() {
        app.session.set_top_n(top_n);
    }
    ui.separator();

    ui.checkbox(&mut app.show_raw_data, "Raw data preview");

    if let Some(source) = app.session.source() {
        ui.separator();
        let (label, path) = match source {
            Source::Workbook(p) => ("Workbook", p),
            Source::Directory(p) => ("Folder", p),
        };
        ui.label(RichText::new(format!("{label}: {}", path.display())).small());
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, app: &mut DashboardApp) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open workbook…").clicked() {
                open_file_dialog(app);
                ui.close_menu();
            }
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(app);
                ui.close_menu();
            }
            if ui.button("Open configured health folder").clicked() {
                let dir = app.health_data_dir.clone();
                app.session.open(Source::Directory(dir));
                ui.close_menu();
            }
        });

        if ui.button("Reload").clicked() {
            app.session.reload();
        }

        ui.separator();

        if let Some(wb) = app.session.workbook() {
            ui.label(format!("{} table(s) loaded", wb.len()))
                .on_hover_text(wb.table_names().join(", "));
        }

        if let Some(msg) = &app.session.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – dashboard
// ---------------------------------------------------------------------------

/// Render the dashboard for the current source.
pub fn central_panel(ui: &mut Ui, app: &mut DashboardApp) {
    let colors = app.colors.clone();
    let show_raw = app.show_raw_data;
    let mut active_tab = app.active_tab;

    let Some(view) = app.session.view() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a workbook or data folder to build the dashboard  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(view.kind.title());
            warnings(ui, view);
            match view.kind {
                DashboardKind::Gallery => gallery(ui, view, &colors),
                DashboardKind::Health => tabs(ui, view, &colors, &mut active_tab),
            }
        });
    app.active_tab = active_tab;

    if show_raw {
        if let Some(wb) = app.session.workbook() {
            egui::Window::new("Raw data").default_width(600.0).show(ui.ctx(), |ui: &mut Ui| {
                ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                    for table in &wb.tables {
                        raw_table(ui, table);
                    }
                });
            });
        }
    }
}

fn warnings(ui: &mut Ui, view: &DashboardView) {
    for w in &view.warnings {
        ui.label(RichText::new(format!("⚠ {w}")).color(Color32::from_rgb(0xFF, 0xB0, 0x20)));
    }
}

/// Charts two per row, a single chart spanning the row.
fn gallery(ui: &mut Ui, view: &DashboardView, colors: &ChartColors) {
    for (s, section) in view.sections.iter().enumerate() {
        if section.charts.len() == 1 {
            let id = format!("gallery_{s}_0");
            plot::chart(ui, &id, &section.charts[0], colors);
            plot::caption(ui, &section.charts[0]);
        } else {
            ui.columns(section.charts.len(), |cols| {
                for (c, chart) in section.charts.iter().enumerate() {
                    let id = format!("gallery_{s}_{c}");
                    plot::chart(&mut cols[c], &id, chart, colors);
                    plot::caption(&mut cols[c], chart);
                }
            });
        }
        ui.add_space(12.0);
    }
}

fn tabs(ui: &mut Ui, view: &DashboardView, colors: &ChartColors, active: &mut usize) {
    ui.horizontal(|ui: &mut Ui| {
        for (i, section) in view.sections.iter().enumerate() {
            ui.selectable_value(active, i, section.title.as_str());
        }
    });
    ui.separator();

    let Some(section) = view.sections.get(*active) else {
        return;
    };
    if !section.kpis.is_empty() {
        ui.columns(section.kpis.len(), |cols| {
            for (col, kpi) in cols.iter_mut().zip(&section.kpis) {
                col.label(RichText::new(&kpi.label).weak());
                match &kpi.value {
                    Ok(v) => col.label(RichText::new(v).size(24.0).strong()),
                    Err(e) => col.label(RichText::new(e).color(Color32::RED)),
                };
            }
        });
        ui.separator();
    }
    for (c, chart) in section.charts.iter().enumerate() {
        let id = format!("tab_{active}_{c}");
        plot::chart(ui, &id, chart, colors);
        plot::caption(ui, chart);
        ui.add_space(12.0);
    }
}

/// Collapsible grid of one table's cells.
fn raw_table(ui: &mut Ui, table: &Table) {
    egui::CollapsingHeader::new(RichText::new(format!("{}  ({} rows)", table.name, table.len())).strong())
        .id_salt(&table.name)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            if table.columns.is_empty() {
                ui.label("No columns.");
                return;
            }
            if table.is_empty() {
                ui.label("No rows.");
            }
            ui.push_id(&table.name, |ui: &mut Ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .max_scroll_height(300.0)
                    .columns(Column::auto().at_least(60.0), table.width())
                    .header(20.0, |mut header| {
                        for name in &table.columns {
                            header.col(|ui: &mut Ui| {
                                ui.strong(name);
                            });
                        }
                    })
                    .body(|body| {
                        body.rows(18.0, table.len(), |mut row| {
                            let cells = &table.rows[row.index()];
                            for cell in cells {
                                row.col(|ui: &mut Ui| {
                                    ui.label(cell.to_string());
                                });
                            }
                        });
                    });
            });
        });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(app: &mut DashboardApp) {
    let file = rfd::FileDialog::new()
        .set_title("Open workbook")
        .add_filter(
            "Supported files",
            &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv", "json", "parquet", "pq"],
        )
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xlsb", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        log::info!("opening workbook {}", path.display());
        app.session.open(Source::Workbook(path));
    }
}

pub fn open_folder_dialog(app: &mut DashboardApp) {
    let folder: Option<PathBuf> = rfd::FileDialog::new()
        .set_title("Open health data folder")
        .set_directory(&app.health_data_dir)
        .pick_folder();

    if let Some(dir) = folder {
        log::info!("opening data folder {}", dir.display());
        app.session.open(Source::Directory(dir));
    }
}
