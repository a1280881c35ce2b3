use anyhow::{anyhow, Context, Result};
use material_uploader::app::MaterialUploader;
use material_uploader::config::AppConfig;
use material_uploader::logging::init_logging;
use std::time::Duration;
use tracing::info;

fn main() -> Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;
    init_logging(&config.log_level)?;
    info!(profiles = config.profiles.len(), "starting course material uploader");

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([640.0, 700.0])
            .with_min_inner_size([420.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Course Material Uploader",
        options,
        Box::new(move |cc| Box::new(MaterialUploader::new(cc, config, handle))),
    )
    .map_err(|err| anyhow!("failed to run the uploader window: {err}"))?;

    runtime.shutdown_timeout(Duration::from_millis(500));
    Ok(())
}
