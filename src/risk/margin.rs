//! Margin requirements and trade admission

use crate::account::{Action, PositionAccount};

/// Margin level reported when no margin is in use
pub const NEUTRAL_MARGIN_LEVEL: f64 = 100.0;

/// Margin needed to carry `volume` notional at `leverage`
pub fn margin_required(volume: f64, leverage: f64) -> f64 {
    volume.abs() / leverage
}

/// Margin level in percent, 100 when no margin is in use or equity is zero
pub fn margin_level(equity: f64, margin_required: f64) -> f64 {
    if equity == 0.0 || margin_required == 0.0 {
        return NEUTRAL_MARGIN_LEVEL;
    }
    let level = equity / margin_required * 100.0;
    if level.is_finite() {
        level
    } else {
        NEUTRAL_MARGIN_LEVEL
    }
}

/// Projected margin state if a trade were executed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarginImpact {
    pub margin_required_after: f64,
    pub margin_free_after: f64,
    /// Infinite when the projected requirement is zero
    pub margin_level_after: f64,
}

impl MarginImpact {
    /// Project the margin effect of `action` for `volume` on the current account.
    ///
    /// Any long or short adds its full requirement, even when it would reduce
    /// the open position.
    pub fn project(account: &PositionAccount, action: Action, volume: f64) -> Self {
        let trade_margin = margin_required(volume, account.leverage);

        let margin_required_after = match action {
            Action::Hold => account.margin_required,
            Action::Long | Action::Short => account.margin_required + trade_margin,
        };
        let equity_after = account.equity;

        let margin_level_after = if margin_required_after != 0.0 {
            equity_after / margin_required_after * 100.0
        } else {
            f64::INFINITY
        };
        let margin_free_after =
            account.margin_free - (margin_required_after - account.margin_required);

        Self {
            margin_required_after,
            margin_free_after,
            margin_level_after,
        }
    }

    /// Whether the trade keeps the account above the stop-out level with free margin left
    pub fn admits(&self, stop_out_level: f64) -> bool {
        self.margin_level_after >= stop_out_level && self.margin_free_after > 0.0
    }
}
