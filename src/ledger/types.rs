//! Ledger record types

use crate::account::Side;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One realized trade leg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Timestep at which the leg executed
    pub time: usize,
    pub side: Side,
    pub price: f64,
    pub quantity: f64,
    /// Realized PnL of the leg, 0 for opening legs
    pub trade_profit: f64,
    pub trade_cost: f64,
}

impl TradeRecord {
    /// Signed quantity: positive for buys, negative for sells
    pub fn signed_quantity(&self) -> f64 {
        self.side.sign() * self.quantity
    }
}

/// Full account state after one `execute` or `close` call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timecount: usize,
    pub timestamp: Option<DateTime<Utc>>,
    pub timestep: usize,
    pub equity: f64,
    pub balance: f64,
    pub nop: f64,
    pub realized_pnl: f64,
    pub unrealized_pnl: f64,
    pub accumulated_cost: f64,
    pub margin_required: f64,
    pub margin_free: f64,
    pub margin_level: f64,
    pub portfolio_leverage: f64,
    pub return_percentage: f64,
    pub log_return: f64,
    pub max_drawdown: f64,
    pub sortino_ratio: f64,
    pub reward: f64,
    pub avg_price: f64,
    pub spot_price: f64,
    pub trade_not_executed: bool,
    pub stopped_out: bool,
    pub goal_reached: bool,
}

/// Aggregate statistics over the realized trade legs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeSummary {
    pub num_trades: usize,
    pub total_profit: f64,
    pub average_profit: f64,
    /// Fraction of legs with positive profit, in [0, 1]
    pub win_rate: f64,
    pub num_winning_trades: usize,
    pub num_losing_trades: usize,
}
