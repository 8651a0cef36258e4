//! Configuration loading tests

use margin_sim::config::{Config, SimConfig};
use std::io::Write;

#[test]
fn test_config_example_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example");
    let config = Config::load(path).unwrap();

    assert_eq!(config.simulator, SimConfig::default());
    assert_eq!(config.runner.max_nop, 15_000_000.0);
    assert_eq!(config.telemetry.log_format, "pretty");
}

#[test]
fn test_partial_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[simulator]\nleverage = 30\n\n[simulator.reward]\nweight_dense = 1.5"
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.simulator.leverage, 30.0);
    assert_eq!(config.simulator.initial_balance, 100_000.0);
    assert_eq!(config.simulator.reward.weight_dense, 1.5);
    assert_eq!(config.simulator.reward.stop_out_penalty, 20.0);
}

#[test]
fn test_malformed_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[simulator\nleverage = ").unwrap();
    assert!(Config::load(file.path()).is_err());
}

#[test]
fn test_config_roundtrips_through_toml() {
    let config = Config::default();
    let rendered = toml::to_string_pretty(&config).unwrap();
    let parsed: Config = toml::from_str(&rendered).unwrap();
    assert_eq!(parsed.simulator, config.simulator);
    assert_eq!(parsed.runner, config.runner);
}
