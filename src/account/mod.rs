//! Position account
//!
//! Core mutable state of one simulated margin account

mod types;

pub use types::{AccountInfo, Action, InvalidAction, OpenPositions, PositionState, Side};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mutable account state for a single leveraged instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionAccount {
    pub initial_balance: f64,
    pub balance: f64,
    pub equity: f64,
    /// Net open position: signed notional exposure
    pub nop: f64,
    /// Volume-weighted entry price of the open position, 0 when flat
    pub avg_price: f64,
    /// Last marked price
    pub spot_price: f64,
    pub leverage: f64,
    pub margin_required: f64,
    pub margin_free: f64,
    /// Margin level in percent
    pub margin_level: f64,
    pub realized_pnl: f64,
    pub unrealized_pnl: f64,
    pub accumulated_cost: f64,
    pub timestep: usize,
    pub timecount: usize,
    pub timestamp: Option<DateTime<Utc>>,
    pub trade_not_executed: bool,
    pub stopped_out: bool,
    pub goal_reached: bool,
}

impl PositionAccount {
    /// Create a flat account holding `initial_balance`
    pub fn new(initial_balance: f64, leverage: f64) -> Self {
        Self {
            initial_balance,
            balance: initial_balance,
            equity: initial_balance,
            nop: 0.0,
            avg_price: 0.0,
            spot_price: 0.0,
            leverage,
            margin_required: 0.0,
            margin_free: initial_balance,
            margin_level: 100.0,
            realized_pnl: 0.0,
            unrealized_pnl: 0.0,
            accumulated_cost: 0.0,
            timestep: 0,
            timecount: 0,
            timestamp: None,
            trade_not_executed: false,
            stopped_out: false,
            goal_reached: false,
        }
    }

    /// Current position state
    pub fn state(&self) -> PositionState {
        PositionState::from_nop(self.nop)
    }

    /// Whether a position is open
    pub fn is_flat(&self) -> bool {
        self.nop == 0.0
    }

    /// Open-position view
    pub fn open_positions(&self) -> OpenPositions {
        OpenPositions {
            nop: self.nop,
            avg_price: self.avg_price,
            spot_price: self.spot_price,
            unrealized_pnl: self.unrealized_pnl,
            trade_not_executed: self.trade_not_executed,
            stopped_out: self.stopped_out,
        }
    }

    /// Charge a trading cost against the balance
    pub(crate) fn charge(&mut self, cost: f64) {
        self.accumulated_cost += cost;
        self.balance -= cost;
    }

    /// Credit a realized profit (or debit a loss)
    pub(crate) fn realize(&mut self, pnl: f64) {
        self.realized_pnl += pnl;
        self.balance += pnl;
    }
}

/// Ladder of starting balances from 10k up to the first value past 1M
pub fn balance_pattern() -> Vec<f64> {
    let mut pattern: Vec<u64> = vec![10_000];
    while let Some(&last) = pattern.last() {
        if last >= 1_000_000 {
            break;
        }
        // x5 on multiples of 50k, x2 otherwise
        let next = if last % 50_000 == 0 { last * 5 } else { last * 2 };
        pattern.push(next);
    }
    pattern.into_iter().map(|v| v as f64).collect()
}
