//! Account views and trade-direction types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Discrete simulator action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Mark the price, no position change
    Hold,
    /// Buy `volume` notional
    Long,
    /// Sell `volume` notional
    Short,
}

/// Action code outside {0, 1, 2}
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid action code: {0}")]
pub struct InvalidAction(pub u8);

impl TryFrom<u8> for Action {
    type Error = InvalidAction;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Action::Hold),
            1 => Ok(Action::Long),
            2 => Ok(Action::Short),
            other => Err(InvalidAction(other)),
        }
    }
}

impl From<Action> for u8 {
    fn from(action: Action) -> Self {
        match action {
            Action::Hold => 0,
            Action::Long => 1,
            Action::Short => 2,
        }
    }
}

/// Side of an executed trade leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Sign applied to the net open position (+1 buy, -1 sell)
    pub fn sign(&self) -> f64 {
        match self {
            Side::Buy => 1.0,
            Side::Sell => -1.0,
        }
    }
}

/// Position state keyed by the sign of the net open position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionState {
    Flat,
    Long,
    Short,
}

impl PositionState {
    pub fn from_nop(nop: f64) -> Self {
        if nop > 0.0 {
            PositionState::Long
        } else if nop < 0.0 {
            PositionState::Short
        } else {
            PositionState::Flat
        }
    }
}

/// Flat read-only view of the account and its derived metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountInfo {
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
}

/// Read-only view of the open position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenPositions {
    pub nop: f64,
    pub avg_price: f64,
    pub spot_price: f64,
    pub unrealized_pnl: f64,
    pub trade_not_executed: bool,
    pub stopped_out: bool,
}
