//! margin-sim: leveraged single-instrument margin trading simulator
//!
//! This library provides the core components for:
//! - Position accounting with volume-weighted entry prices
//! - Margin gating of trades against a stop-out level
//! - Realized/unrealized PnL with proportional trading costs
//! - Return, drawdown and Sortino metrics over the equity curve
//! - A composite reward signal for learning agents
//! - Trade and snapshot ledgers
//! - Replay data sources and an episode runner for backtests

pub mod account;
pub mod backtest;
pub mod cli;
pub mod config;
pub mod ledger;
pub mod performance;
pub mod reward;
pub mod risk;
pub mod simulator;
pub mod source;
pub mod telemetry;

pub use account::{AccountInfo, Action, OpenPositions, PositionAccount};
pub use config::{Config, ConfigError, SimConfig};
pub use simulator::{ExecutionReport, MarginTradeSimulator, SimError};
