mod api;
mod app;
mod config;
mod notify;
mod upload;
mod utils;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use app::PortfolioApp;
use config::ServerConfig;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(base_url = %config.base_url, role = ?config.user_role, "starting portfolio client");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Portfolio Manager",
        options,
        Box::new(move |cc| Box::new(PortfolioApp::new(cc, &config))),
    )
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(())
}
