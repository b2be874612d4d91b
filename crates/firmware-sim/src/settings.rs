//! Simulation settings

use crate::SimError;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use serde::Deserialize;

/// Capacity of the reading buffer, fixed at compile time
pub use ring_buffer::BUFSIZE;

/// Configuration file looked up in the working directory (optional)
pub const CONFIG_FILE: &str = "firmware-sim";

/// Environment variable prefix, e.g. `SIM_SENSOR_PERIOD_MS=50`
pub const ENV_PREFIX: &str = "SIM";

/// Task timing and run length for the simulation
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Sensor sampling period (milliseconds)
    pub sensor_period_ms: u64,
    /// Reporting task drain period (milliseconds)
    pub report_period_ms: u64,
    /// Simulated button press period (milliseconds)
    pub button_period_ms: u64,
    /// Number of readings the sensor task produces before stopping
    pub readings: u32,
    /// Number of distinct alarm ids the button cycles through
    pub alarm_count: i32,
    /// Max log level: trace, debug, info, warn, error
    pub log_level: String,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            sensor_period_ms: 100,
            report_period_ms: 500,
            button_period_ms: 1500,
            readings: 50,
            alarm_count: 4,
            log_level: "info".to_string(),
        }
    }
}

impl SimConfig {
    /// Short run with fast tasks
    pub fn quick() -> Self {
        Self {
            sensor_period_ms: 1,
            report_period_ms: 5,
            button_period_ms: 3,
            readings: 40,
            ..Default::default()
        }
    }

    /// Reporting slower than sampling, so the buffer saturates and drops
    pub fn stress() -> Self {
        Self {
            sensor_period_ms: 1,
            report_period_ms: 40,
            button_period_ms: 2,
            readings: 200,
            ..Default::default()
        }
    }

    /// Load from `firmware-sim.{toml,json,...}` if present, then `SIM_*`
    /// environment variables. Missing keys keep their defaults.
    pub fn load() -> Result<Self, SimError> {
        let builder = config::Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));
        Self::from_builder(builder)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, SimError> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), SimError> {
        if self.sensor_period_ms == 0 || self.report_period_ms == 0 || self.button_period_ms == 0 {
            return Err(SimError::InvalidConfig("task periods must be non-zero".into()));
        }
        if self.alarm_count <= 0 {
            return Err(SimError::InvalidConfig("alarm_count must be positive".into()));
        }
        Ok(())
    }
}
