use eframe::egui::{RichText, Ui};

use crate::color::HEADER_BLUE;
use crate::state::AppState;

pub mod format;
pub mod panels;
pub mod plot;
pub mod stats;
pub mod table;

/// Render the central dashboard: metrics, charts, table, statistics.
pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(
            RichText::new("Health Insurance Claims Dashboard")
                .size(28.0)
                .strong()
                .color(HEADER_BLUE),
        );
    });
    ui.add_space(8.0);

    section(ui, "Summary");
    stats::metrics_row(ui, &state.report);

    section(ui, "Charts");
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("Monthly claim trend");
        plot::monthly_trend(&mut cols[0], &state.report);
        cols[1].strong("Claim status distribution");
        plot::status_distribution(&mut cols[1], &state.report, &state.status_colors);
    });
    ui.separator();
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("Percentage paid distribution");
        plot::percentage_histogram(&mut cols[0], &state.report);
        cols[1].strong("Top 10 diagnoses");
        plot::top_diagnoses(&mut cols[1], &state.report);
    });

    section(ui, "Records");
    table::records_table(ui, state);

    section(ui, "Export");
    if ui.button("Download as CSV…").clicked() {
        panels::export_dialog(state);
    }

    section(ui, "Descriptive statistics");
    stats::describe_table(ui, &state.report);
    ui.add_space(8.0);
    stats::insights(ui, &state.report);
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.separator();
    ui.heading(RichText::new(title).color(HEADER_BLUE));
    ui.add_space(4.0);
}
