//! Firmware Shared-State Simulation - Main Entry Point

use firmware_sim::{init_logging, run, SimConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = SimConfig::load()?;
    init_logging(&config.log_level)?;

    info!("=== Firmware shared-state simulation v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {:?}", config);

    let report = run(config).await?;

    info!(
        "Done: produced {}, published {}, dropped {}, alarm changes {}, last alarm {}",
        report.produced, report.published, report.dropped, report.alarm_changes, report.last_alarm
    );

    Ok(())
}
