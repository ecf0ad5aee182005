use eframe::egui::{self, Frame, RichText, Stroke, Ui};

use claims_dashboard::data::report::DashboardReport;
use claims_dashboard::data::stats::{NumericColumn, PaymentLevel};

use crate::color::{LIGHT_BLUE, MEDIUM_BLUE, PRIMARY_BLUE};
use crate::ui::format;

// ---------------------------------------------------------------------------
// Metrics row
// ---------------------------------------------------------------------------

/// Four headline cards over the filtered view.
pub fn metrics_row(ui: &mut Ui, report: &DashboardReport<'_>) {
    let m = &report.summary;
    ui.columns(4, |cols: &mut [Ui]| {
        metric_card(
            &mut cols[0],
            "Total claims",
            &format::count(m.total_claims),
            &format!("of {} total", format::count(m.dataset_claims)),
        );
        metric_card(
            &mut cols[1],
            "Total submitted",
            &format::currency(m.total_submitted),
            &format!("{} of all submissions", format::percent(m.submitted_share)),
        );
        metric_card(
            &mut cols[2],
            "Total paid",
            &format::currency(m.total_paid),
            &format!("{} of submitted", format::percent(m.paid_ratio)),
        );
        metric_card(
            &mut cols[3],
            "Average % paid",
            &format::ratio(m.avg_percentage_paid),
            &format!("median {}", format::ratio(m.median_percentage_paid)),
        );
    });
}

fn metric_card(ui: &mut Ui, title: &str, value: &str, delta: &str) {
    Frame::group(ui.style())
        .fill(LIGHT_BLUE)
        .stroke(Stroke::new(1.0, MEDIUM_BLUE))
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(title).small());
            ui.label(RichText::new(value).size(22.0).strong().color(PRIMARY_BLUE));
            ui.label(RichText::new(delta).small().weak());
        });
}

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

pub fn describe_table(ui: &mut Ui, report: &DashboardReport<'_>) {
    egui::Grid::new("describe_table")
        .striped(true)
        .num_columns(report.describe.len() + 1)
        .min_col_width(110.0)
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for (column, _) in &report.describe {
                ui.strong(column.name());
            }
            ui.end_row();

            let Some((_, first)) = report.describe.first() else {
                return;
            };
            for (row, (label, _)) in first.rows().iter().enumerate() {
                ui.strong(*label);
                for (column, describe) in &report.describe {
                    let value = describe.rows()[row].1;
                    ui.label(describe_cell(*column, *label, value));
                }
                ui.end_row();
            }
        });
}

fn describe_cell(column: NumericColumn, stat: &str, value: f64) -> String {
    if stat == "count" {
        format::thousands(value)
    } else if column.is_ratio() {
        format::ratio(value)
    } else {
        format::currency(value)
    }
}

// ---------------------------------------------------------------------------
// Insights
// ---------------------------------------------------------------------------

pub fn insights(ui: &mut Ui, report: &DashboardReport<'_>) {
    let i = &report.insights;
    ui.strong("Insights");

    ui.label(format!("• Average claim submitted: {}", format::currency(i.avg_submitted)));
    ui.label(format!("• Average claim paid: {}", format::currency(i.avg_paid)));
    ui.label(format!("• Average percentage paid: {}", format::ratio(i.avg_percentage_paid)));

    let level_color = match i.payment_level {
        PaymentLevel::VeryGood => egui::Color32::DARK_GREEN,
        PaymentLevel::FairlyGood => PRIMARY_BLUE,
        PaymentLevel::NeedsAttention => egui::Color32::from_rgb(200, 90, 0),
    };
    ui.label(RichText::new(format!("• {}", i.payment_level.label())).color(level_color));
    ui.label(format!("• Payment variability is {}", i.variability.label()));
    ui.label(format!("• {} records analysed", format::count(i.records)));
    ui.label(format!(
        "• {} outliers in claims paid ({})",
        format::count(i.outliers),
        format::percent(i.outlier_share)
    ));
}
