mod app;
mod color;
mod config;
mod data;
mod export;
mod pipeline;
mod state;
mod ui;

use app::SolarCompareApp;
use clap::Parser;
use config::Args;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Args: {args:?}");

    let state = AppState::new(args.mode(), args.source_set(), args.metric);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Cross-Country Solar Data Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(SolarCompareApp::new(state)))),
    )
}
