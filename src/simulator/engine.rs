//! Margin trade simulator engine

use super::execution;
use super::{ExecutionReport, SimError};
use crate::account::{AccountInfo, Action, OpenPositions, PositionAccount, Side};
use crate::config::{ConfigError, SimConfig};
use crate::ledger::{Snapshot, TradeLedger, TradeRecord, TradeSummary};
use crate::performance::{finite_or, PerformanceTracker};
use crate::reward::{calculate_reward, RewardInputs};
use crate::risk::{margin, MarginImpact};
use crate::telemetry::{self, CounterMetric};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// Single-instrument leveraged account simulator
///
/// A deterministic state machine advanced one call at a time by an external
/// driver supplying a price and an action.
pub struct MarginTradeSimulator {
    config: SimConfig,
    price_series: Vec<f64>,
    account: PositionAccount,
    account_info: AccountInfo,
    previous_account_info: AccountInfo,
    tracker: PerformanceTracker,
    ledger: TradeLedger,
    /// `execute` calls refused by the margin gate since the last reset
    rejected_trades: usize,
}

impl MarginTradeSimulator {
    /// Create a simulator over `price_series` and reset it
    pub fn new(price_series: Vec<f64>, config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut sim = Self {
            account: PositionAccount::new(config.initial_balance, config.leverage),
            tracker: PerformanceTracker::new(config.risk_free_rate),
            config,
            price_series,
            account_info: AccountInfo::default(),
            previous_account_info: AccountInfo::default(),
            ledger: TradeLedger::new(),
            rejected_trades: 0,
        };
        sim.reset();
        Ok(sim)
    }

    /// Return to a flat account at the configured initial balance
    pub fn reset(&mut self) {
        self.account = PositionAccount::new(self.config.initial_balance, self.config.leverage);
        self.ledger.clear();
        self.tracker.clear();
        self.rejected_trades = 0;
        self.account_info = AccountInfo::default();
        self.previous_account_info = AccountInfo::default();
        self.refresh();
        self.previous_account_info = self.account_info.clone();
    }

    /// Reset with a different starting balance
    pub fn reset_with_balance(&mut self, initial_balance: f64) -> Result<(), ConfigError> {
        let config = SimConfig {
            initial_balance,
            ..self.config.clone()
        };
        config.validate()?;
        self.config = config;
        self.reset();
        Ok(())
    }

    /// Run one step: gate `action` on margin, execute or hold, score and record
    pub fn execute<A>(
        &mut self,
        action: A,
        price: f64,
        volume: f64,
    ) -> Result<ExecutionReport, SimError>
    where
        A: TryInto<Action>,
        SimError: From<A::Error>,
    {
        let action: Action = action.try_into()?;
        validate_price(price)?;
        if !volume.is_finite() || volume < 0.0 {
            return Err(SimError::InvalidVolume(volume));
        }

        self.account.trade_not_executed = false;
        self.previous_account_info = self.account_info.clone();

        let impact = MarginImpact::project(&self.account, action, volume);
        let executed = impact.admits(self.config.stop_out_level);

        if executed {
            let legs = match action {
                Action::Hold => {
                    execution::hold(&mut self.account, price);
                    0
                }
                Action::Long => self.trade(Side::Buy, price, volume),
                Action::Short => self.trade(Side::Sell, price, volume),
            };
            if legs > 0 {
                telemetry::increment(CounterMetric::TradesExecuted);
            }
        } else {
            self.account.trade_not_executed = true;
            self.rejected_trades += 1;
            execution::hold(&mut self.account, price);
            telemetry::increment(CounterMetric::TradesRejected);
            warn!(
                ?action,
                price,
                volume,
                margin_level_after = impact.margin_level_after,
                margin_free_after = impact.margin_free_after,
                "Trade not executed: insufficient margin"
            );
        }

        self.refresh();
        let reward = self.update_reward();
        self.push_snapshot();

        Ok(ExecutionReport {
            action,
            executed,
            reward,
        })
    }

    /// Flatten the open position at `price`. No-op when already flat.
    pub fn close(&mut self, price: f64) -> Result<(), SimError> {
        validate_price(price)?;
        if self.account.is_flat() {
            return Ok(());
        }

        let side = if self.account.nop > 0.0 {
            Side::Sell
        } else {
            Side::Buy
        };
        let volume = self.account.nop.abs();
        self.trade(side, price, volume);

        self.refresh();
        self.update_reward();
        self.push_snapshot();
        Ok(())
    }

    /// Mark at `price` and close everything once the profit target is exceeded.
    ///
    /// Returns whether the goal was reached on this call.
    pub fn check_goal(&mut self, price: f64) -> Result<bool, SimError> {
        validate_price(price)?;
        self.mark(price);

        if self.account_info.return_percentage > self.config.max_profit_target {
            self.account.goal_reached = true;
            telemetry::increment(CounterMetric::ForcedCloses);
            warn!(
                return_percentage = self.account_info.return_percentage,
                "Goal reached, closing all positions"
            );
            self.close(price)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Mark at `price` and close everything once the loss cut is breached.
    ///
    /// Returns whether the account was stopped out on this call.
    pub fn check_stopped_out(&mut self, price: f64) -> Result<bool, SimError> {
        validate_price(price)?;
        self.mark(price);

        if self.account_info.return_percentage < self.config.cut_loss {
            self.account.stopped_out = true;
            telemetry::increment(CounterMetric::ForcedCloses);
            warn!(
                return_percentage = self.account_info.return_percentage,
                "Stopped out, closing all positions"
            );
            self.close(price)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Advance the step clock by one, optionally stamping the new step
    pub fn advance(&mut self, timestamp: Option<DateTime<Utc>>) {
        self.account.timecount += 1;
        self.account.timestep += 1;
        if timestamp.is_some() {
            self.account.timestamp = timestamp;
        }
    }

    /// Overwrite the step index without touching the step counter
    pub fn set_timestep(&mut self, timestep: usize) {
        self.account.timestep = timestep;
    }

    /// Stamp the current step
    pub fn update_timestamp(&mut self, timestamp: DateTime<Utc>) {
        self.account.timestamp = Some(timestamp);
    }

    /// Whether the step clock sits on an episode boundary
    pub fn is_end_of_episode(&self) -> bool {
        self.account.timecount > 0 && self.account.timecount % self.config.max_timestep == 0
    }

    /// Account info as of the last refresh
    pub fn account_info(&self) -> &AccountInfo {
        &self.account_info
    }

    /// Account info as it was before the last `execute`
    pub fn previous_account_info(&self) -> &AccountInfo {
        &self.previous_account_info
    }

    /// Open-position view of the account
    pub fn open_positions(&self) -> OpenPositions {
        self.account.open_positions()
    }

    /// Raw account state
    pub fn account(&self) -> &PositionAccount {
        &self.account
    }

    /// Trade legs recorded since the last reset
    pub fn done_trades(&self) -> &[TradeRecord] {
        self.ledger.done_trades()
    }

    /// Per-step snapshots since the last reset
    pub fn record(&self) -> &[Snapshot] {
        self.ledger.record()
    }

    /// Trade and snapshot ledger
    pub fn ledger(&self) -> &TradeLedger {
        &self.ledger
    }

    /// Equity curve, one point per refresh
    pub fn equity_history(&self) -> &[f64] {
        self.tracker.equity_history()
    }

    /// Aggregate statistics over the recorded trade legs
    pub fn trade_summary(&self) -> TradeSummary {
        self.ledger.summary()
    }

    /// Price series the simulator was built over
    pub fn price_series(&self) -> &[f64] {
        &self.price_series
    }

    /// Price at `index`, if the series is that long
    pub fn price_at(&self, index: usize) -> Option<f64> {
        self.price_series.get(index).copied()
    }

    /// Active simulator configuration
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Number of `execute` calls the margin gate refused since the last reset
    pub fn rejected_trades(&self) -> usize {
        self.rejected_trades
    }

    fn trade(&mut self, side: Side, price: f64, volume: f64) -> usize {
        let legs = execution::trade(
            &mut self.account,
            &mut self.ledger,
            self.config.fee_rate,
            side,
            price,
            volume,
        );
        if self.config.debug {
            debug!(
                ?side,
                price,
                volume,
                legs,
                state = ?self.account.state(),
                nop = self.account.nop,
                avg_price = self.account.avg_price,
                accumulated_cost = self.account.accumulated_cost,
                "Order executed"
            );
        }
        legs
    }

    fn mark(&mut self, price: f64) {
        execution::hold(&mut self.account, price);
        self.refresh();
    }

    /// Recompute equity, margin and performance metrics from account state
    fn refresh(&mut self) {
        let account = &mut self.account;
        account.equity = account.balance + account.unrealized_pnl;
        account.margin_required = margin::margin_required(account.nop, account.leverage);
        account.margin_free = account.equity - account.margin_required;
        account.margin_level = margin::margin_level(account.equity, account.margin_required);

        let metrics = self
            .tracker
            .record(account.equity, account.initial_balance, account.nop);

        self.account_info = AccountInfo {
            timestep: account.timestep,
            equity: finite_or(account.equity, 0.0),
            balance: finite_or(account.balance, 0.0),
            nop: account.nop,
            realized_pnl: finite_or(account.realized_pnl, 0.0),
            unrealized_pnl: finite_or(account.unrealized_pnl, 0.0),
            accumulated_cost: finite_or(account.accumulated_cost, 0.0),
            margin_required: finite_or(account.margin_required, 0.0),
            margin_free: finite_or(account.margin_free, 0.0),
            margin_level: finite_or(account.margin_level, margin::NEUTRAL_MARGIN_LEVEL),
            portfolio_leverage: metrics.portfolio_leverage,
            return_percentage: metrics.return_percentage,
            log_return: metrics.log_return,
            max_drawdown: metrics.max_drawdown,
            sortino_ratio: metrics.sortino_ratio,
            reward: self.account_info.reward,
        };
    }

    fn update_reward(&mut self) -> f64 {
        let breakdown = calculate_reward(
            &RewardInputs {
                current: &self.account_info,
                previous: &self.previous_account_info,
                initial_balance: self.account.initial_balance,
                trade_not_executed: self.account.trade_not_executed,
                stopped_out: self.account.stopped_out,
            },
            &self.config.reward,
        );
        if self.config.debug {
            debug!(?breakdown, "Reward");
        }
        self.account_info.reward = breakdown.total;
        telemetry::record_account(&self.account_info);
        breakdown.total
    }

    fn push_snapshot(&mut self) {
        let info = &self.account_info;
        let account = &self.account;
        self.ledger.push_snapshot(Snapshot {
            timecount: account.timecount,
            timestamp: account.timestamp,
            timestep: account.timestep,
            equity: info.equity,
            balance: info.balance,
            nop: info.nop,
            realized_pnl: info.realized_pnl,
            unrealized_pnl: info.unrealized_pnl,
            accumulated_cost: info.accumulated_cost,
            margin_required: info.margin_required,
            margin_free: info.margin_free,
            margin_level: info.margin_level,
            portfolio_leverage: info.portfolio_leverage,
            return_percentage: info.return_percentage,
            log_return: info.log_return,
            max_drawdown: info.max_drawdown,
            sortino_ratio: info.sortino_ratio,
            reward: info.reward,
            avg_price: account.avg_price,
            spot_price: account.spot_price,
            trade_not_executed: account.trade_not_executed,
            stopped_out: account.stopped_out,
            goal_reached: account.goal_reached,
        });
    }
}

fn validate_price(price: f64) -> Result<(), SimError> {
    if price.is_finite() && price > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidPrice(price))
    }
}
