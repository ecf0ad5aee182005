mod app;
mod color;
mod config;
mod state;
mod ui;

use anyhow::{anyhow, Context};
use clap::Parser;
use eframe::egui;

use claims_dashboard::data::cache;

use app::ClaimsDashboardApp;
use config::DashboardArgs;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = DashboardArgs::parse();
    let dataset = cache::load(&args.data)
        .with_context(|| format!("loading claims from {}", args.data.display()))?;
    log::info!(
        "{} claims, {} statuses, years {:?}",
        dataset.len(),
        dataset.statuses().len(),
        dataset.years()
    );

    let state = AppState::new(dataset, args.period, args.page_size, args.export_dir);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Claims Dashboard",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Ok(Box::new(ClaimsDashboardApp::new(state)))
        }),
    )
    .map_err(|e| anyhow!("running the dashboard window: {e}"))
}
