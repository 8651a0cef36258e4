//! Simulator metrics
//!
//! Emitted through the `metrics` facade; whichever recorder the host
//! process installs receives them.

use crate::account::AccountInfo;

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Current equity
    Equity,
    /// Cash balance
    Balance,
    /// Unrealized P&L
    UnrealizedPnl,
    /// Realized P&L
    RealizedPnl,
    /// Net open position
    NetOpenPosition,
    /// Margin level percentage
    MarginLevel,
    /// Maximum drawdown percentage
    DrawdownPct,
    /// Last step reward
    Reward,
}

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Trades admitted by the margin gate
    TradesExecuted,
    /// Trades rejected by the margin gate
    TradesRejected,
    /// Positions closed by goal, stop-out or drawdown halt
    ForcedCloses,
}

impl GaugeMetric {
    fn name(self) -> &'static str {
        match self {
            GaugeMetric::Equity => "marginsim_equity",
            GaugeMetric::Balance => "marginsim_balance",
            GaugeMetric::UnrealizedPnl => "marginsim_unrealized_pnl",
            GaugeMetric::RealizedPnl => "marginsim_realized_pnl",
            GaugeMetric::NetOpenPosition => "marginsim_nop",
            GaugeMetric::MarginLevel => "marginsim_margin_level_pct",
            GaugeMetric::DrawdownPct => "marginsim_max_drawdown_pct",
            GaugeMetric::Reward => "marginsim_reward",
        }
    }
}

impl CounterMetric {
    fn name(self) -> &'static str {
        match self {
            CounterMetric::TradesExecuted => "marginsim_trades_executed_total",
            CounterMetric::TradesRejected => "marginsim_trades_rejected_total",
            CounterMetric::ForcedCloses => "marginsim_forced_closes_total",
        }
    }
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    metrics::gauge!(metric.name()).set(value);
}

/// Increment a counter by one
pub fn increment(metric: CounterMetric) {
    metrics::counter!(metric.name()).increment(1);
}

/// Publish the account gauges after a refresh
pub fn record_account(info: &AccountInfo) {
    set_gauge(GaugeMetric::Equity, info.equity);
    set_gauge(GaugeMetric::Balance, info.balance);
    set_gauge(GaugeMetric::UnrealizedPnl, info.unrealized_pnl);
    set_gauge(GaugeMetric::RealizedPnl, info.realized_pnl);
    set_gauge(GaugeMetric::NetOpenPosition, info.nop);
    set_gauge(GaugeMetric::MarginLevel, info.margin_level);
    set_gauge(GaugeMetric::DrawdownPct, info.max_drawdown);
    set_gauge(GaugeMetric::Reward, info.reward);
}
