use std::ops::RangeInclusive;

use eframe::egui::{Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints, Points};

use claims_dashboard::data::model::MonthPeriod;
use claims_dashboard::data::report::DashboardReport;

use crate::color::{ColorMap, PRIMARY_BLUE};

const CHART_HEIGHT: f32 = 300.0;

fn chart(id: &str) -> Plot {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
}

/// Axis label for integer grid marks that index into `labels`.
fn category_label(labels: &[String], mark: GridMark) -> String {
    let idx = mark.value.round();
    if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Monthly trend (line)
// ---------------------------------------------------------------------------

pub fn monthly_trend(ui: &mut Ui, report: &DashboardReport<'_>) {
    let points: Vec<[f64; 2]> = report
        .monthly
        .iter()
        .map(|p| [p.period.ordinal() as f64, p.count as f64])
        .collect();

    chart("monthly_trend")
        .x_axis_label("Month")
        .y_axis_label("Claims")
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            if mark.value.fract().abs() > 1e-6 {
                return String::new();
            }
            MonthPeriod::from_ordinal(mark.value as i64).to_string()
        })
        .show(ui, |plot_ui| {
            let line = Line::new(PlotPoints::from(points.clone()))
                .name("Claims")
                .color(PRIMARY_BLUE)
                .width(3.0);
            plot_ui.line(line);
            plot_ui.points(Points::new(PlotPoints::from(points)).color(PRIMARY_BLUE).radius(3.0));
        });
}

// ---------------------------------------------------------------------------
// Status distribution (bars)
// ---------------------------------------------------------------------------

pub fn status_distribution(ui: &mut Ui, report: &DashboardReport<'_>, colors: &ColorMap) {
    let total = report.view.len().max(1) as f64;
    let labels: Vec<String> = report.statuses.iter().map(|c| c.label.clone()).collect();
    let bars: Vec<Bar> = report
        .statuses
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Bar::new(i as f64, c.count as f64)
                .name(format!("{} ({:.1}%)", c.label, c.count as f64 / total * 100.0))
                .fill(colors.color_for(&c.label))
                .stroke(Stroke::new(1.0, PRIMARY_BLUE))
                .width(0.6)
        })
        .collect();

    chart("status_distribution")
        .y_axis_label("Claims")
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| category_label(&labels, mark))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Percentage paid histogram
// ---------------------------------------------------------------------------

pub fn percentage_histogram(ui: &mut Ui, report: &DashboardReport<'_>) {
    let bars: Vec<Bar> = report
        .percentage_histogram
        .iter()
        .map(|bin| {
            let width = (bin.upper - bin.lower).max(0.01);
            Bar::new((bin.lower + bin.upper) / 2.0, bin.count as f64)
                .width(width)
                .name(format!("{:.0}% - {:.0}%", bin.lower * 100.0, bin.upper * 100.0))
        })
        .collect();

    chart("percentage_histogram")
        .x_axis_label("Percentage paid")
        .y_axis_label("Frequency")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(PRIMARY_BLUE));
        });
}

// ---------------------------------------------------------------------------
// Top diagnoses (horizontal bars, largest on top)
// ---------------------------------------------------------------------------

pub fn top_diagnoses(ui: &mut Ui, report: &DashboardReport<'_>) {
    // Reverse so the most frequent diagnosis sits at the top of the axis.
    let ranked: Vec<_> = report.top_diagnoses.iter().rev().collect();
    let labels: Vec<String> = ranked.iter().map(|c| c.label.clone()).collect();
    let bars: Vec<Bar> = ranked
        .iter()
        .enumerate()
        .map(|(i, c)| Bar::new(i as f64, c.count as f64).name(&c.label).width(0.7))
        .collect();

    chart("top_diagnoses")
        .x_axis_label("Claims")
        .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| category_label(&labels, mark))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().color(PRIMARY_BLUE));
        });
}
