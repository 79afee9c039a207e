mod app;
mod chart;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::VehicleDashApp;
use config::AppConfig;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().context("reading configuration")?;
    let table = data::loader::load_csv(&config.dataset_path)
        .with_context(|| format!("loading {}", config.dataset_path.display()))?;
    let state = AppState::new(config, table);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Vehicle Dash – Used Listings Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(VehicleDashApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the UI: {e}"))
}
