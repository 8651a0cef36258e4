//! Backtesting module
//!
//! Runs policies against replayed price series through the simulator

mod analytics;
mod policy;
mod runner;

pub use analytics::BacktestSummary;
pub use policy::{Decision, Policy, RandomPolicy, ScriptedPolicy, ACTION_SPACE};
pub use runner::{EpisodeRunner, RunError, RunOutcome, Termination};
