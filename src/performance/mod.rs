//! Performance tracker
//!
//! Keeps the equity curve of an episode and derives return, drawdown and
//! Sortino metrics from it.

pub mod ratios;

use serde::{Deserialize, Serialize};

/// Replace NaN or infinite values with `default`
pub fn finite_or(value: f64, default: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        default
    }
}

/// Derived metrics for one account refresh
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub return_percentage: f64,
    pub log_return: f64,
    pub max_drawdown: f64,
    pub sortino_ratio: f64,
    pub portfolio_leverage: f64,
}

/// Equity curve and metric derivation
#[derive(Debug, Clone)]
pub struct PerformanceTracker {
    equity_history: Vec<f64>,
    risk_free_rate: f64,
}

impl PerformanceTracker {
    pub fn new(risk_free_rate: f64) -> Self {
        Self {
            equity_history: Vec::new(),
            risk_free_rate,
        }
    }

    /// Compute metrics for `equity` from the curve so far, then append it.
    ///
    /// Drawdown and Sortino see only the history preceding this point.
    pub fn record(&mut self, equity: f64, initial_balance: f64, nop: f64) -> Metrics {
        let metrics = Metrics {
            return_percentage: finite_or(ratios::return_percentage(equity, initial_balance), 0.0),
            log_return: finite_or(ratios::log_return(equity, initial_balance), 0.0),
            max_drawdown: finite_or(ratios::max_drawdown(&self.equity_history), 0.0),
            sortino_ratio: finite_or(
                ratios::sortino_ratio(&self.equity_history, self.risk_free_rate),
                0.0,
            ),
            portfolio_leverage: finite_or(ratios::portfolio_leverage(nop, equity), 0.0),
        };
        self.equity_history.push(equity);
        metrics
    }

    /// Recorded equity curve
    pub fn equity_history(&self) -> &[f64] {
        &self.equity_history
    }

    pub fn clear(&mut self) {
        self.equity_history.clear();
    }
}
