//! Reward calculator
//!
//! Combines account state into one scalar training signal:
//! dense unrealized PnL, a holding bonus, a capped cost penalty,
//! Sortino shaping, invalid-action and stop-out penalties, realized PnL
//! and a sparse log-return term.

use crate::account::AccountInfo;
use crate::performance::finite_or;
use serde::{Deserialize, Serialize};

/// Named weights of the reward components
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RewardWeights {
    #[serde(default = "default_weight_dense")]
    pub weight_dense: f64,
    #[serde(default = "default_weight_sparse")]
    pub weight_sparse: f64,
    #[serde(default = "default_weight_shaping")]
    pub weight_shaping: f64,
    /// Flat bonus while holding a profitable position
    #[serde(default = "default_holding_reward")]
    pub holding_reward: f64,
    /// Cap on the accumulated-cost penalty
    #[serde(default = "default_trading_cost_penalty")]
    pub trading_cost_penalty: f64,
    #[serde(default = "default_stop_out_penalty")]
    pub stop_out_penalty: f64,
    #[serde(default = "default_realized_pnl_weight")]
    pub realized_pnl_weight: f64,
    #[serde(default = "default_invalid_action_penalty")]
    pub invalid_action_penalty: f64,
}

fn default_weight_dense() -> f64 {
    0.8
}
fn default_weight_sparse() -> f64 {
    1.0
}
fn default_weight_shaping() -> f64 {
    0.3
}
fn default_holding_reward() -> f64 {
    0.5
}
fn default_trading_cost_penalty() -> f64 {
    0.1
}
fn default_stop_out_penalty() -> f64 {
    20.0
}
fn default_realized_pnl_weight() -> f64 {
    2.0
}
fn default_invalid_action_penalty() -> f64 {
    0.0005
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            weight_dense: default_weight_dense(),
            weight_sparse: default_weight_sparse(),
            weight_shaping: default_weight_shaping(),
            holding_reward: default_holding_reward(),
            trading_cost_penalty: default_trading_cost_penalty(),
            stop_out_penalty: default_stop_out_penalty(),
            realized_pnl_weight: default_realized_pnl_weight(),
            invalid_action_penalty: default_invalid_action_penalty(),
        }
    }
}

/// Everything the reward depends on
#[derive(Debug, Clone, Copy)]
pub struct RewardInputs<'a> {
    pub current: &'a AccountInfo,
    pub previous: &'a AccountInfo,
    pub initial_balance: f64,
    pub trade_not_executed: bool,
    pub stopped_out: bool,
}

/// Per-component reward decomposition
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RewardBreakdown {
    pub dense: f64,
    pub holding: f64,
    pub cost_penalty: f64,
    pub shaping: f64,
    pub invalid_penalty: f64,
    pub realized: f64,
    pub sparse: f64,
    pub stop_out: f64,
    pub total: f64,
}

/// Compute the step reward. Pure: no side effects.
pub fn calculate_reward(inputs: &RewardInputs<'_>, weights: &RewardWeights) -> RewardBreakdown {
    let current = inputs.current;

    let dense = current.unrealized_pnl * weights.weight_dense;

    let holding = if current.nop != 0.0 && current.unrealized_pnl > 0.0 {
        weights.holding_reward
    } else {
        0.0
    };

    let cost_penalty = -current.accumulated_cost.min(weights.trading_cost_penalty);

    let shaping = current.sortino_ratio.max(0.0) * weights.weight_shaping;

    let invalid_penalty = if inputs.trade_not_executed {
        -weights.invalid_action_penalty
    } else {
        0.0
    };

    let log_return = if current.equity > 0.0 && inputs.initial_balance > 0.0 {
        (current.equity / inputs.initial_balance).ln()
    } else {
        0.0
    };
    let sparse = log_return * weights.weight_sparse;

    let realized = current.realized_pnl * weights.realized_pnl_weight;

    let stop_out = if inputs.stopped_out {
        -weights.stop_out_penalty
    } else {
        0.0
    };

    let total =
        dense + holding + cost_penalty + shaping + invalid_penalty + realized + sparse + stop_out;

    let breakdown = RewardBreakdown {
        dense,
        holding,
        cost_penalty,
        shaping,
        invalid_penalty,
        realized,
        sparse,
        stop_out,
        total: finite_or(total, 0.0),
    };

    tracing::trace!(
        current_equity = current.equity,
        previous_equity = inputs.previous.equity,
        ?breakdown,
        "Reward computed"
    );

    breakdown
}
