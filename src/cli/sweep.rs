//! Sweep command implementation

use super::run::{build_policy, SourceArgs};
use crate::backtest::{BacktestSummary, EpisodeRunner};
use crate::config::Config;
use crate::simulator::MarginTradeSimulator;
use clap::Args;
use tokio::task::JoinSet;

#[derive(Args, Debug)]
pub struct SweepArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Leverages to compare, comma separated
    #[arg(long, value_delimiter = ',', default_value = "10,50,100,200")]
    pub leverage: Vec<f64>,
}

impl SweepArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let summaries = self.run(config).await?;
        for summary in &summaries {
            println!("{}", summary.format_line());
        }
        Ok(())
    }

    /// Run one independent episode per leverage on the blocking pool.
    /// Results are ordered by leverage.
    pub async fn run(&self, config: &Config) -> anyhow::Result<Vec<BacktestSummary>> {
        let source = self.source.load_source(config)?;
        let actions = self.source.load_actions()?;
        let seed = self.source.seed(config);

        let mut tasks = JoinSet::new();
        for &leverage in &self.leverage {
            let mut source = source.clone();
            let actions = actions.clone();
            let mut sim_config = config.simulator.clone();
            sim_config.leverage = leverage;
            let runner_config = config.runner.clone();

            tasks.spawn_blocking(move || -> anyhow::Result<BacktestSummary> {
                let simulator = MarginTradeSimulator::new(source.prices(), sim_config)?;
                let mut runner = EpisodeRunner::new(simulator, runner_config);
                let mut policy = build_policy(actions, seed);
                let outcome = runner.run(&mut source, policy.as_mut())?;
                Ok(outcome.summary)
            });
        }

        let mut summaries = Vec::with_capacity(self.leverage.len());
        while let Some(joined) = tasks.join_next().await {
            summaries.push(joined??);
        }
        summaries.sort_by(|a, b| a.leverage.total_cmp(&b.leverage));

        tracing::info!(runs = summaries.len(), "Sweep finished");
        Ok(summaries)
    }
}
