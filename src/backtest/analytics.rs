//! Backtest analytics and reporting

use crate::simulator::MarginTradeSimulator;
use serde::Serialize;

/// Summary statistics of one episode
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BacktestSummary {
    /// Leverage the episode ran at
    pub leverage: f64,
    /// Starting balance
    pub initial_balance: f64,
    /// Equity at the end of the episode
    pub final_equity: f64,
    /// Net P&L after costs
    pub net_pnl: f64,
    /// Return percentage
    pub return_pct: f64,
    /// Sortino ratio
    pub sortino_ratio: f64,
    /// Maximum drawdown percentage
    pub max_drawdown_pct: f64,
    /// Win rate over recorded trade legs, in [0, 1]
    pub win_rate: f64,
    /// Total number of trade legs
    pub total_trades: usize,
    /// Total trading cost paid
    pub accumulated_cost: f64,
    /// Steps on which the margin gate refused the action
    pub rejected_trades: usize,
}

impl BacktestSummary {
    /// Summarize the simulator's current episode
    pub fn from_simulator(sim: &MarginTradeSimulator) -> Self {
        let info = sim.account_info();
        let trades = sim.trade_summary();
        let initial_balance = sim.account().initial_balance;

        Self {
            leverage: sim.config().leverage,
            initial_balance,
            final_equity: info.equity,
            net_pnl: info.equity - initial_balance,
            return_pct: info.return_percentage,
            sortino_ratio: info.sortino_ratio,
            max_drawdown_pct: info.max_drawdown,
            win_rate: trades.win_rate,
            total_trades: trades.num_trades,
            accumulated_cost: info.accumulated_cost,
            rejected_trades: sim.rejected_trades(),
        }
    }

    /// Format as table for CLI output
    pub fn format_table(&self) -> String {
        format!(
            r#"
══════════════════════════════════════════════════════
               BACKTEST RESULTS
══════════════════════════════════════════════════════

PERFORMANCE
───────────────────────────────────────────────────────
Leverage:         {:.0}x
Initial Balance:  {:.2}
Final Equity:     {:.2}
Net P&L:          {:+.2} ({:+.2}%)
Sortino Ratio:    {:.2}
Max Drawdown:     {:.2}%
Win Rate:         {:.1}%

ACTIVITY
───────────────────────────────────────────────────────
Total Trades:     {}
Rejected Trades:  {}
Trading Cost:     {:.2}
══════════════════════════════════════════════════════
"#,
            self.leverage,
            self.initial_balance,
            self.final_equity,
            self.net_pnl,
            self.return_pct,
            self.sortino_ratio,
            self.max_drawdown_pct,
            self.win_rate * 100.0,
            self.total_trades,
            self.rejected_trades,
            self.accumulated_cost,
        )
    }

    /// One-line summary for sweeps
    pub fn format_line(&self) -> String {
        format!(
            "leverage {:>6.0}x  net {:>+12.2}  return {:>+8.2}%  maxdd {:>6.2}%  trades {:>5}  rejected {:>5}",
            self.leverage,
            self.net_pnl,
            self.return_pct,
            self.max_drawdown_pct,
            self.total_trades,
            self.rejected_trades,
        )
    }
}
