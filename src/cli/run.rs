//! Run command implementation

use crate::backtest::{EpisodeRunner, Policy, RandomPolicy, RunOutcome, ScriptedPolicy};
use crate::config::Config;
use crate::simulator::MarginTradeSimulator;
use crate::source::ReplaySource;
use anyhow::Context;
use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};

/// Series length when neither a file nor a length is given
const DEFAULT_SYNTHETIC_LEN: usize = 2_000;

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Price series and policy selection shared by `run` and `sweep`
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// JSON price series: numbers or {timestamp, price} objects
    #[arg(long, conflicts_with = "synthetic")]
    pub prices: Option<PathBuf>,

    /// Generate a synthetic series of this many ticks
    #[arg(long)]
    pub synthetic: Option<usize>,

    /// Seed for synthetic data and the random policy (defaults to runner.seed)
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON array of discrete action indices (0..=200) to replay instead of
    /// the random policy
    #[arg(long)]
    pub actions: Option<PathBuf>,
}

impl SourceArgs {
    pub fn seed(&self, config: &Config) -> u64 {
        self.seed.unwrap_or(config.runner.seed)
    }

    pub fn load_source(&self, config: &Config) -> anyhow::Result<ReplaySource> {
        let source = match &self.prices {
            Some(path) => ReplaySource::load_json(path)
                .with_context(|| format!("Failed to load prices from {}", path.display()))?,
            None => ReplaySource::synthetic(
                self.synthetic.unwrap_or(DEFAULT_SYNTHETIC_LEN),
                self.seed(config),
            )?,
        };
        Ok(source)
    }

    pub fn load_actions(&self) -> anyhow::Result<Option<Vec<usize>>> {
        self.actions.as_deref().map(load_actions).transpose()
    }
}

fn load_actions(path: &Path) -> anyhow::Result<Vec<usize>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read actions from {}", path.display()))?;
    let indices: Vec<usize> = serde_json::from_str(&content)?;
    Ok(indices)
}

/// Scripted policy when indices are given, seeded random policy otherwise
pub fn build_policy(actions: Option<Vec<usize>>, seed: u64) -> Box<dyn Policy + Send> {
    match actions {
        Some(indices) => Box::new(ScriptedPolicy::new(indices)),
        None => Box::new(RandomPolicy::new(seed)),
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Override the configured leverage
    #[arg(long)]
    pub leverage: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl RunArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let outcome = self.run(config)?;

        match self.format {
            OutputFormat::Table => {
                println!("{}", outcome.summary.format_table());
                println!("Termination: {:?} after {} steps", outcome.termination, outcome.steps);
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        }
        Ok(())
    }

    /// Run the episode without printing
    pub fn run(&self, config: &Config) -> anyhow::Result<RunOutcome> {
        let mut sim_config = config.simulator.clone();
        if let Some(leverage) = self.leverage {
            sim_config.leverage = leverage;
        }

        let mut source = self.source.load_source(config)?;
        let mut policy = build_policy(self.source.load_actions()?, self.source.seed(config));

        tracing::info!(ticks = source.len(), leverage = sim_config.leverage, "Starting run");

        let simulator = MarginTradeSimulator::new(source.prices(), sim_config)?;
        let mut runner = EpisodeRunner::new(simulator, config.runner.clone());
        let outcome = runner.run(&mut source, policy.as_mut())?;
        Ok(outcome)
    }
}
