//! Configuration types for margin-sim

use crate::reward::RewardWeights;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub simulator: SimConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Invalid construction parameters
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Leverage must be strictly positive
    #[error("Leverage must be > 0, got {0}")]
    InvalidLeverage(f64),
    /// Starting balance must be strictly positive
    #[error("Initial balance must be > 0, got {0}")]
    InvalidInitialBalance(f64),
    /// Fee rate must be non-negative
    #[error("Fee rate must be >= 0, got {0}")]
    InvalidFeeRate(f64),
    /// Episode length must be at least one step
    #[error("max_timestep must be > 0")]
    ZeroMaxTimestep,
    /// A parameter is NaN or infinite
    #[error("{0} must be finite")]
    NotFinite(&'static str),
    /// A runner size parameter is negative
    #[error("{0} must be >= 0")]
    Negative(&'static str),
    /// High-water-mark drop must be a fraction in [0, 1]
    #[error("hwm_drop must be within [0, 1], got {0}")]
    InvalidHwmDrop(f64),
    /// Session window must be non-empty and within a day
    #[error("Session hours must satisfy start < end <= 24, got {start}..{end}")]
    InvalidSessionHours { start: u32, end: u32 },
}

/// Simulator parameters, passed explicitly at construction
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimConfig {
    /// Account leverage (notional / margin)
    #[serde(default = "default_leverage")]
    pub leverage: f64,

    /// Starting balance in account currency
    #[serde(default = "default_initial_balance")]
    pub initial_balance: f64,

    /// Minimum post-trade margin level (%) for a trade to be admitted
    #[serde(default = "default_stop_out_level")]
    pub stop_out_level: f64,

    /// Annual risk-free rate used by the Sortino ratio
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,

    /// Proportional fee charged on every executed leg
    #[serde(default = "default_fee_rate")]
    pub fee_rate: f64,

    /// Return percentage above which the goal is reached
    #[serde(default = "default_max_profit_target")]
    pub max_profit_target: f64,

    /// Return percentage below which the account is stopped out
    #[serde(default = "default_cut_loss")]
    pub cut_loss: f64,

    /// Episode length in steps (end-of-episode when timecount is a multiple)
    #[serde(default = "default_max_timestep")]
    pub max_timestep: usize,

    /// Emit per-trade debug logging
    #[serde(default)]
    pub debug: bool,

    /// Reward component weights
    #[serde(default)]
    pub reward: RewardWeights,
}

fn default_leverage() -> f64 {
    100.0
}
fn default_initial_balance() -> f64 {
    100_000.0
}
fn default_stop_out_level() -> f64 {
    50.0
}
fn default_risk_free_rate() -> f64 {
    0.0003
}
fn default_fee_rate() -> f64 {
    0.0008
}
fn default_max_profit_target() -> f64 {
    120.0
}
fn default_cut_loss() -> f64 {
    -25.0
}
fn default_max_timestep() -> usize {
    1120
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            leverage: default_leverage(),
            initial_balance: default_initial_balance(),
            stop_out_level: default_stop_out_level(),
            risk_free_rate: default_risk_free_rate(),
            fee_rate: default_fee_rate(),
            max_profit_target: default_max_profit_target(),
            cut_loss: default_cut_loss(),
            max_timestep: default_max_timestep(),
            debug: false,
            reward: RewardWeights::default(),
        }
    }
}

impl SimConfig {
    /// Check construction parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("leverage", self.leverage),
            ("initial_balance", self.initial_balance),
            ("stop_out_level", self.stop_out_level),
            ("risk_free_rate", self.risk_free_rate),
            ("fee_rate", self.fee_rate),
            ("max_profit_target", self.max_profit_target),
            ("cut_loss", self.cut_loss),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NotFinite(name));
        }
        if self.leverage <= 0.0 {
            return Err(ConfigError::InvalidLeverage(self.leverage));
        }
        if self.initial_balance <= 0.0 {
            return Err(ConfigError::InvalidInitialBalance(self.initial_balance));
        }
        if self.fee_rate < 0.0 {
            return Err(ConfigError::InvalidFeeRate(self.fee_rate));
        }
        if self.max_timestep == 0 {
            return Err(ConfigError::ZeroMaxTimestep);
        }
        Ok(())
    }
}

/// Episode runner configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RunnerConfig {
    /// Volume lot size; sized volumes are floored to a multiple of this
    #[serde(default = "default_unit")]
    pub unit: f64,

    /// Cap on absolute net open position
    #[serde(default = "default_max_nop")]
    pub max_nop: f64,

    /// Fractional equity drop from the high-water mark that halts trading
    #[serde(default = "default_hwm_drop")]
    pub hwm_drop: f64,

    /// Trade only on every Nth step
    #[serde(default = "default_batch_interval")]
    pub batch_interval: usize,

    /// First UTC hour (inclusive) in which trading is allowed
    #[serde(default = "default_session_start_hour")]
    pub session_start_hour: u32,

    /// Last UTC hour (exclusive) in which trading is allowed
    #[serde(default = "default_session_end_hour")]
    pub session_end_hour: u32,

    /// Pick the episode's starting balance from the balance ladder
    #[serde(default)]
    pub random_balance: bool,

    /// Seed for the policy and balance RNG
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_unit() -> f64 {
    1.0
}
fn default_max_nop() -> f64 {
    15_000_000.0
}
fn default_hwm_drop() -> f64 {
    0.15
}
fn default_batch_interval() -> usize {
    15
}
fn default_session_start_hour() -> u32 {
    1
}
fn default_session_end_hour() -> u32 {
    21
}
fn default_seed() -> u64 {
    42
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            unit: default_unit(),
            max_nop: default_max_nop(),
            hwm_drop: default_hwm_drop(),
            batch_interval: default_batch_interval(),
            session_start_hour: default_session_start_hour(),
            session_end_hour: default_session_end_hour(),
            random_balance: false,
            seed: default_seed(),
        }
    }
}

impl RunnerConfig {
    /// Reject parameters that would halt or idle every episode
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("unit", self.unit),
            ("max_nop", self.max_nop),
            ("hwm_drop", self.hwm_drop),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NotFinite(name));
        }
        if self.unit < 0.0 {
            return Err(ConfigError::Negative("unit"));
        }
        if self.max_nop < 0.0 {
            return Err(ConfigError::Negative("max_nop"));
        }
        if !(0.0..=1.0).contains(&self.hwm_drop) {
            return Err(ConfigError::InvalidHwmDrop(self.hwm_drop));
        }
        if self.session_start_hour >= self.session_end_hour || self.session_end_hour > 24 {
            return Err(ConfigError::InvalidSessionHours {
                start: self.session_start_hour,
                end: self.session_end_hour,
            });
        }
        Ok(())
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.simulator.validate()?;
        config.runner.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            [simulator]
            leverage = 50
            initial_balance = 25000.0
            stop_out_level = 80
            fee_rate = 0.0006
            debug = true

            [simulator.reward]
            stop_out_penalty = 40.0

            [runner]
            batch_interval = 5
            max_nop = 300000

            [telemetry]
            log_level = "debug"
            log_format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.simulator.leverage, 50.0);
        assert_eq!(config.simulator.initial_balance, 25_000.0);
        assert_eq!(config.simulator.fee_rate, 0.0006);
        assert!(config.simulator.debug);
        // Unspecified fields fall back to defaults
        assert_eq!(config.simulator.cut_loss, -25.0);
        assert_eq!(config.simulator.reward.stop_out_penalty, 40.0);
        assert_eq!(config.simulator.reward.weight_dense, 0.8);
        assert_eq!(config.runner.batch_interval, 5);
        assert_eq!(config.runner.hwm_drop, 0.15);
        assert_eq!(config.telemetry.log_format, "json");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.simulator, SimConfig::default());
        assert_eq!(config.runner, RunnerConfig::default());
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn test_sim_config_defaults() {
        let config = SimConfig::default();
        assert_eq!(config.leverage, 100.0);
        assert_eq!(config.initial_balance, 100_000.0);
        assert_eq!(config.stop_out_level, 50.0);
        assert_eq!(config.risk_free_rate, 0.0003);
        assert_eq!(config.fee_rate, 0.0008);
        assert_eq!(config.max_profit_target, 120.0);
        assert_eq!(config.max_timestep, 1120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_leverage() {
        let config = SimConfig {
            leverage: 0.0,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidLeverage(0.0)));
    }

    #[test]
    fn test_validate_rejects_bad_balance() {
        let config = SimConfig {
            initial_balance: -1.0,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidInitialBalance(-1.0))
        );
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let config = SimConfig {
            risk_free_rate: f64::NAN,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotFinite("risk_free_rate"))
        );
    }

    #[test]
    fn test_validate_rejects_zero_timestep() {
        let config = SimConfig {
            max_timestep: 0,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroMaxTimestep));
    }

    #[test]
    fn test_runner_validate() {
        assert!(RunnerConfig::default().validate().is_ok());

        let config = RunnerConfig {
            hwm_drop: -0.1,
            ..RunnerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidHwmDrop(-0.1)));

        let config = RunnerConfig {
            session_start_hour: 21,
            session_end_hour: 21,
            ..RunnerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidSessionHours { start: 21, end: 21 })
        );

        let config = RunnerConfig {
            session_end_hour: 25,
            ..RunnerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSessionHours { .. })
        ));

        let config = RunnerConfig {
            max_nop: -1.0,
            ..RunnerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Negative("max_nop")));
    }

    #[test]
    fn test_config_load_rejects_invalid_runner() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[runner]\nsession_start_hour = 22\nsession_end_hour = 2").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Session hours"));
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_load_rejects_invalid_simulator() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[simulator]\nleverage = -5").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Leverage"));
    }
}
