//! Telemetry module
//!
//! Logging and simulator metrics

mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat};
pub use self::metrics::{increment, record_account, set_gauge, CounterMetric, GaugeMetric};

use crate::config::TelemetryConfig;

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    let format: LogFormat = config.log_format.parse()?;
    init_logging(&config.log_level, format)
}
