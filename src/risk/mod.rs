//! Margin & risk gate
//!
//! Margin requirements, trade admission, PnL formulas and drawdown controls

mod limits;
pub mod margin;
pub mod pnl;

pub use limits::{HaltReason, HwmGuard};
pub use margin::{margin_level, margin_required, MarginImpact};
