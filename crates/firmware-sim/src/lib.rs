//! Firmware Shared-State Simulation
//!
//! Runs the sensor, reporting and button tasks of the firmware on a host
//! runtime, wired together through the protected buffer and variable.

mod error;
mod settings;
mod tasks;

pub use error::SimError;
pub use settings::{SimConfig, BUFSIZE, CONFIG_FILE, ENV_PREFIX};
pub use tasks::{button_task, reporting_task, run, sensor_task, SharedState, SimReport, NO_ALARM};

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Install the global `tracing` subscriber at the given max level
pub fn init_logging(level: &str) -> Result<(), SimError> {
    let level: Level = level
        .parse()
        .map_err(|_| SimError::InvalidLogLevel(level.to_string()))?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
