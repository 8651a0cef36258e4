//! High-water-mark drawdown guard

use serde::{Deserialize, Serialize};

/// Reason the runner stopped trading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HaltReason {
    /// Equity fell more than the allowed fraction below its peak
    HwmDropReached(f64),
}

/// Tracks peak equity and halts once equity falls too far below it
pub struct HwmGuard {
    /// Peak equity value
    pub peak_equity: f64,
    /// Current equity value
    pub current_equity: f64,
    /// Maximum tolerated fractional drop from peak
    pub max_drop: f64,
}

impl HwmGuard {
    /// Create a new guard starting at `initial_equity`
    pub fn new(initial_equity: f64, max_drop: f64) -> Self {
        Self {
            peak_equity: initial_equity,
            current_equity: initial_equity,
            max_drop,
        }
    }

    /// Record a new equity observation without moving the peak
    pub fn observe(&mut self, equity: f64) {
        self.current_equity = equity;
    }

    /// Raise the peak if equity made a new high
    pub fn update_peak(&mut self, equity: f64) {
        self.current_equity = equity;
        if equity > self.peak_equity {
            self.peak_equity = equity;
        }
    }

    /// Current fractional drawdown from peak
    pub fn current_drawdown(&self) -> f64 {
        if self.peak_equity <= 0.0 {
            return 0.0;
        }
        (self.peak_equity - self.current_equity) / self.peak_equity
    }

    /// Check if trading should be halted
    pub fn should_halt(&self) -> Option<HaltReason> {
        if self.current_equity < self.peak_equity * (1.0 - self.max_drop) {
            return Some(HaltReason::HwmDropReached(self.current_drawdown()));
        }
        None
    }
}
