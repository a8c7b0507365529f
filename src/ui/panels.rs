use std::path::Path;

use eframe::egui::{self, Color32, RichText, TextEdit, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{DisplayMode, MAX_STEPS, MIN_STEPS};
use crate::data::{export, loader};
use crate::state::{AppState, Status, StatusLevel};

const ROW_HEIGHT: f32 = 22.0;

// ---------------------------------------------------------------------------
// Left side panel – step entry
// ---------------------------------------------------------------------------

/// Render the left panel: step count, per-step densities, bulk paste.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Step wedge");
    ui.separator();

    // ---- Step count ----
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Steps");
        ui.add(egui::DragValue::new(&mut state.pending_step_count).range(MIN_STEPS..=MAX_STEPS));
        if ui.button("Generate grid").clicked() {
            state.generate_grid(state.pending_step_count);
        }
    });
    ui.label(
        RichText::new("Step 1 is the densest (most exposed) patch.")
            .small()
            .weak(),
    );
    ui.separator();

    // ---- Bottom controls first so the table can take the remaining height ----
    egui::TopBottomPanel::bottom("entry_controls")
        .show_separator_line(false)
        .show_inside(ui, |ui: &mut Ui| {
            bulk_paste(ui, state);
            ui.separator();
            ui.horizontal(|ui: &mut Ui| {
                if ui.button(RichText::new("Plot curve").strong()).clicked() {
                    state.submit();
                }
                if ui.button("Reset").clicked() {
                    state.reset();
                }
            });
            ui.add_space(4.0);
        });

    // ---- Per-step fields ----
    if step_table(ui, &mut state.fields) {
        state.submit();
    }
}

/// Table of step fields. Returns true when Enter was pressed in one of them.
fn step_table(ui: &mut Ui, fields: &mut [String]) -> bool {
    let mut enter_pressed = false;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(false)
        .column(Column::exact(48.0))
        .column(Column::remainder())
        .auto_shrink([false, false])
        .header(ROW_HEIGHT, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("Step");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("OD");
            });
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, fields.len(), |mut row| {
                let i = row.index();
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{}", i + 1));
                });
                row.col(|ui: &mut Ui| {
                    let response = ui.add(
                        TextEdit::singleline(&mut fields[i])
                            .hint_text("0.00")
                            .desired_width(f32::INFINITY),
                    );
                    if response.lost_focus() && ui.input(|inp| inp.key_pressed(egui::Key::Enter)) {
                        enter_pressed = true;
                    }
                });
            });
        });

    enter_pressed
}

fn bulk_paste(ui: &mut Ui, state: &mut AppState) {
    egui::CollapsingHeader::new("Paste all readings")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.label(
                RichText::new(format!(
                    "{} values, step 1 first, separated by commas, spaces or new lines.",
                    state.step_count
                ))
                .small(),
            );
            ui.add(
                TextEdit::multiline(&mut state.bulk_text)
                    .desired_rows(5)
                    .desired_width(f32::INFINITY),
            );
            if ui.button("Apply pasted values").clicked() {
                state.apply_bulk();
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open readings…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let has_curve = state.geometry.is_some();
            if ui.add_enabled(has_curve, egui::Button::new("Export CSV…")).clicked() {
                save_file_dialog(state, ExportFormat::Csv);
                ui.close_menu();
            }
            if ui.add_enabled(has_curve, egui::Button::new("Export JSON…")).clicked() {
                save_file_dialog(state, ExportFormat::Json);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Reset").clicked() {
                state.reset();
                ui.close_menu();
            }
        });

        ui.separator();

        let mut auto_scale = state.mode == DisplayMode::AutoScale;
        if ui.checkbox(&mut auto_scale, "Auto-scale Y axis").changed() {
            state.set_mode(if auto_scale {
                DisplayMode::AutoScale
            } else {
                DisplayMode::Fixed
            });
        }

        let mut show_gamma = state.show_gamma;
        if ui.checkbox(&mut show_gamma, "Gamma").changed() {
            state.set_show_gamma(show_gamma);
        }

        ui.separator();

        if let Some(status) = &state.status {
            let color = match status.level {
                StatusLevel::Info => Color32::from_rgb(40, 150, 70),
                StatusLevel::Warning => Color32::from_rgb(210, 140, 20),
                StatusLevel::Error => Color32::RED,
            };
            ui.label(RichText::new(&status.message).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open step wedge readings")
        .add_filter("Supported files", &["csv", "json", "txt"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Text", &["txt"])
        .pick_file();

    if let Some(path) = file {
        load_path(state, &path);
    }
}

/// Load readings from `path` into the session, reporting failures in the status line.
pub fn load_path(state: &mut AppState, path: &Path) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    match loader::load_file(path) {
        Ok(values) => state.load_readings(&values, &name),
        Err(e) => {
            log::error!("Failed to load file: {e:#}");
            state.status = Some(Status::error(format!("Error: {e:#}")));
        }
    }
}

#[derive(Clone, Copy)]
enum ExportFormat {
    Csv,
    Json,
}

fn save_file_dialog(state: &mut AppState, format: ExportFormat) {
    let Some(geometry) = &state.geometry else {
        return;
    };
    let (label, ext) = match format {
        ExportFormat::Csv => ("CSV", "csv"),
        ExportFormat::Json => ("JSON", "json"),
    };

    let Some(path) = rfd::FileDialog::new()
        .set_title("Export curve")
        .set_file_name(format!("hd_curve.{ext}"))
        .add_filter(label, &[ext])
        .save_file()
    else {
        return;
    };

    let result = match format {
        ExportFormat::Csv => export::export_csv(&path, geometry),
        ExportFormat::Json => export::export_json(&path, geometry),
    };
    match result {
        Ok(()) => {
            log::info!("Exported curve to {}", path.display());
            state.status = Some(Status::info(format!(
                "Saved {}",
                path.display()
            )));
        }
        Err(e) => {
            log::error!("Failed to export curve: {e:#}");
            state.status = Some(Status::error(format!("Error: {e:#}")));
        }
    }
}
