use chrono::Local;
use eframe::egui::{self, Color32, ComboBox, RichText, ScrollArea, Ui};

use claims_dashboard::data::export::export_file_name;
use claims_dashboard::data::filter::Selection;
use claims_dashboard::data::range::{Preset, MONTH_NAMES};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            period_filter(ui, state);
            ui.separator();
            category_filters(ui, state);
        });
}

fn period_filter(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Period");
    let years: Vec<String> = state.dataset.years().iter().map(|y| y.to_string()).collect();
    ui.label(format!("Data available: {}", years.join(", ")));

    let mut changed = false;
    ui.horizontal(|ui: &mut Ui| {
        changed |= ui.radio_value(&mut state.use_custom_range, false, "Preset").changed();
        changed |= ui.radio_value(&mut state.use_custom_range, true, "Custom range").changed();
    });

    if state.use_custom_range {
        let dataset = state.dataset;
        let years = dataset.years();
        let custom = &mut state.custom;
        egui::Grid::new("custom_range").num_columns(2).show(ui, |ui: &mut Ui| {
            ui.label("From");
            ui.label("To");
            ui.end_row();
            changed |= year_picker(ui, "start_year", &mut custom.start_year, years);
            changed |= year_picker(ui, "end_year", &mut custom.end_year, years);
            ui.end_row();
            changed |= month_picker(ui, "start_month", &mut custom.start_month);
            changed |= month_picker(ui, "end_month", &mut custom.end_month);
            ui.end_row();
        });
    } else {
        ComboBox::from_id_salt("preset")
            .selected_text(state.preset.label())
            .show_ui(ui, |ui: &mut Ui| {
                for preset in Preset::ALL {
                    changed |= ui
                        .selectable_value(&mut state.preset, preset, preset.label())
                        .changed();
                }
            });
    }

    if changed {
        state.refilter();
    }

    ui.label(
        RichText::new(format!(
            "Selected period:\n{}",
            state.criteria.date_range.describe()
        ))
        .italics(),
    );
}

fn year_picker(ui: &mut Ui, id: &str, value: &mut i32, years: &[i32]) -> bool {
    let mut changed = false;
    ComboBox::from_id_salt(id)
        .selected_text(value.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for &year in years {
                changed |= ui.selectable_value(value, year, year.to_string()).changed();
            }
        });
    changed
}

fn month_picker(ui: &mut Ui, id: &str, value: &mut u32) -> bool {
    let mut changed = false;
    let current = MONTH_NAMES
        .get((*value as usize).wrapping_sub(1))
        .copied()
        .unwrap_or("?");
    ComboBox::from_id_salt(id)
        .selected_text(current)
        .show_ui(ui, |ui: &mut Ui| {
            for (month, name) in (1u32..).zip(MONTH_NAMES) {
                changed |= ui.selectable_value(value, month, name).changed();
            }
        });
    changed
}

fn category_filters(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Claim status");
    let mut status = state.criteria.status.clone();
    selection_combo(ui, "status", &mut status, state.status_options());
    state.set_status(status);

    ui.add_space(4.0);
    ui.strong("Diagnosis");
    let mut diagnosis = state.criteria.diagnosis.clone();
    selection_combo(ui, "diagnosis", &mut diagnosis, state.diagnosis_options());
    state.set_diagnosis(diagnosis);
}

fn selection_combo(ui: &mut Ui, id: &str, current: &mut Selection, options: Vec<Selection>) {
    ComboBox::from_id_salt(id)
        .selected_text(current.label().to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in options {
                let label = option.label().to_string();
                ui.selectable_value(current, option, label);
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
            if ui.button("Export CSV…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} claims loaded, {} in selection",
            state.dataset.len(),
            state.report.view.len()
        ));

        ui.separator();

        if let Some(msg) = &state.status_message {
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::DARK_GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Export dialog
// ---------------------------------------------------------------------------

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered claims")
        .set_directory(&state.export_dir)
        .set_file_name(export_file_name(Local::now().naive_local()))
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export(&path) {
            log::error!("Failed to export: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
