//! Episode runner
//!
//! Drives a simulator from a data source with a policy: trading window,
//! position sizing, goal/stop-out checks and the high-water-mark halt.

use super::{BacktestSummary, Decision, Policy};
use crate::account::{balance_pattern, AccountInfo, Action, Side};
use crate::config::{ConfigError, RunnerConfig};
use crate::risk::HwmGuard;
use crate::simulator::{MarginTradeSimulator, SimError};
use crate::source::{DataSource, Order, PriceTick, SourceError};
use crate::telemetry::{self, CounterMetric};
use chrono::Timelike;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The data source ran out of prices
    EndOfData,
    /// The step clock hit the episode length
    EndOfEpisode,
    GoalReached,
    StoppedOut,
    /// Equity fell too far below its high-water mark
    DrawdownHalt,
}

/// Episode runner errors
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Sim(#[from] SimError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result of one episode
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub termination: Termination,
    pub steps: usize,
    pub summary: BacktestSummary,
    pub final_account: AccountInfo,
}

/// Runs episodes of a simulator
pub struct EpisodeRunner {
    config: RunnerConfig,
    simulator: MarginTradeSimulator,
    rng: StdRng,
}

impl EpisodeRunner {
    pub fn new(simulator: MarginTradeSimulator, config: RunnerConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            simulator,
            rng,
        }
    }

    pub fn simulator(&self) -> &MarginTradeSimulator {
        &self.simulator
    }

    /// Reset the simulator and run one episode to completion
    pub fn run<S, P>(&mut self, source: &mut S, policy: &mut P) -> Result<RunOutcome, RunError>
    where
        S: DataSource + ?Sized,
        P: Policy + ?Sized,
    {
        self.config.validate()?;
        self.start_episode()?;

        let mut hwm = HwmGuard::new(self.simulator.account_info().equity, self.config.hwm_drop);
        let mut termination = Termination::EndOfData;
        let mut steps = 0;
        let mut last_price = None;

        info!(
            initial_balance = self.simulator.account().initial_balance,
            leverage = self.simulator.config().leverage,
            "Episode started"
        );

        while let Some(tick) = source.next_price() {
            let price = tick.price;
            let trading_allowed = self.trading_allowed(&tick);

            self.simulator.advance(tick.timestamp);
            steps += 1;
            last_price = Some(price);

            if self.simulator.is_end_of_episode() {
                self.simulator.close(price)?;
                termination = Termination::EndOfEpisode;
                break;
            }
            if self.simulator.check_goal(price)? {
                termination = Termination::GoalReached;
                break;
            }
            if self.simulator.check_stopped_out(price)? {
                termination = Termination::StoppedOut;
                break;
            }

            hwm.observe(self.simulator.account_info().equity);
            if let Some(reason) = hwm.should_halt() {
                warn!(?reason, "Drawdown limit hit, closing all positions");
                telemetry::increment(CounterMetric::ForcedCloses);
                self.simulator.close(price)?;
                termination = Termination::DrawdownHalt;
                break;
            }

            let decision = if trading_allowed {
                policy.decide(self.simulator.account_info(), price)
            } else {
                Decision::Hold
            };
            let (action, volume) = self.size(decision, price);

            let report = self.simulator.execute(action, price, volume)?;
            if report.executed && volume > 0.0 {
                let side = match action {
                    Action::Long => Some(Side::Buy),
                    Action::Short => Some(Side::Sell),
                    Action::Hold => None,
                };
                if let Some(side) = side {
                    source.commit_order(&Order {
                        side,
                        price,
                        volume,
                        timestamp: tick.timestamp,
                    })?;
                }
            }

            hwm.update_peak(self.simulator.account_info().equity);
        }

        if let Some(price) = last_price {
            self.simulator.close(price)?;
        }

        let summary = BacktestSummary::from_simulator(&self.simulator);
        info!(
            ?termination,
            steps,
            net_pnl = summary.net_pnl,
            trades = summary.total_trades,
            "Episode finished"
        );

        Ok(RunOutcome {
            termination,
            steps,
            summary,
            final_account: self.simulator.account_info().clone(),
        })
    }

    fn start_episode(&mut self) -> Result<(), ConfigError> {
        if self.config.random_balance {
            if let Some(&balance) = balance_pattern().choose(&mut self.rng) {
                return self.simulator.reset_with_balance(balance);
            }
        }
        self.simulator.reset();
        Ok(())
    }

    /// Trades happen on batch boundaries inside the session hours
    fn trading_allowed(&self, tick: &PriceTick) -> bool {
        let batch = self.config.batch_interval.max(1);
        if self.simulator.account().timecount % batch != 0 {
            return false;
        }
        match tick.timestamp {
            Some(ts) => {
                let hour = ts.hour();
                hour >= self.config.session_start_hour && hour < self.config.session_end_hour
            }
            None => true,
        }
    }

    /// Turn an equity fraction into a lot-rounded volume capped by the NOP limit
    pub fn size(&self, decision: Decision, price: f64) -> (Action, f64) {
        let action = decision.action();
        if action == Action::Hold {
            return (Action::Hold, 0.0);
        }

        let equity = self.simulator.account_info().equity;
        if equity <= 0.0 || price <= 0.0 {
            return (action, 0.0);
        }
        let leverage = self.simulator.config().leverage;
        let volume = self.round_to_unit(decision.fraction() * equity * leverage);

        // Exposure left before |nop| would exceed the cap after this order
        let nop = self.simulator.account().nop;
        let opposing = match action {
            Action::Long => nop < 0.0,
            Action::Short => nop > 0.0,
            Action::Hold => false,
        };
        let room = if opposing {
            self.config.max_nop + nop.abs()
        } else {
            self.config.max_nop - nop.abs()
        };
        let capped = self.round_to_unit(room.max(0.0));

        (action, volume.min(capped))
    }

    fn round_to_unit(&self, volume: f64) -> f64 {
        let unit = self.config.unit;
        if unit > 0.0 {
            (volume / unit).floor() * unit
        } else {
            volume
        }
    }
}
