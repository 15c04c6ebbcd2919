mod app;
mod chart;
mod color;
mod config;
mod data;
mod layout;
mod state;
mod ui;
mod web;

use std::sync::Arc;

use anyhow::Context;
use app::LaunchDashApp;
use clap::Parser;
use config::Config;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    // The dashboard cannot run without its dataset: any load error ends the
    // process before a window or socket is opened.
    let dataset = data::loader::load_file(&config.data)
        .context("the dashboard needs a valid launch records file")?;
    log::info!(
        "Loaded {} launches from {} sites, payload {}..={} kg",
        dataset.len(),
        dataset.sites().len(),
        dataset.min_payload(),
        dataset.max_payload()
    );
    let dataset = Arc::new(dataset);

    if config.gui {
        run_gui(dataset)
    } else {
        web::start(&config.addr(), dataset)
    }
}

fn run_gui(dataset: Arc<data::model::LaunchDataset>) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        layout::DASHBOARD_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(LaunchDashApp::new(dataset)))),
    )
    .map_err(|e| anyhow::anyhow!("running the desktop window: {e}"))
}
