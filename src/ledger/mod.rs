//! Trade ledger
//!
//! Append-only history of realized trade legs and per-step account snapshots

mod types;

pub use types::{Snapshot, TradeRecord, TradeSummary};

/// Trade and snapshot history for one episode
#[derive(Debug, Clone, Default)]
pub struct TradeLedger {
    done_trades: Vec<TradeRecord>,
    record: Vec<Snapshot>,
}

impl TradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_trade(&mut self, trade: TradeRecord) {
        self.done_trades.push(trade);
    }

    pub fn push_snapshot(&mut self, snapshot: Snapshot) {
        self.record.push(snapshot);
    }

    pub fn done_trades(&self) -> &[TradeRecord] {
        &self.done_trades
    }

    pub fn record(&self) -> &[Snapshot] {
        &self.record
    }

    /// Drop all trades and snapshots
    pub fn clear(&mut self) {
        self.done_trades.clear();
        self.record.clear();
    }

    /// Signed sum of traded quantities (buys positive, sells negative)
    pub fn net_quantity(&self) -> f64 {
        self.done_trades.iter().map(TradeRecord::signed_quantity).sum()
    }

    /// Summarize realized legs. Legs with zero profit count as losing.
    pub fn summary(&self) -> TradeSummary {
        let num_trades = self.done_trades.len();
        if num_trades == 0 {
            return TradeSummary::default();
        }

        let total_profit: f64 = self.done_trades.iter().map(|t| t.trade_profit).sum();
        let num_winning_trades = self
            .done_trades
            .iter()
            .filter(|t| t.trade_profit > 0.0)
            .count();

        TradeSummary {
            num_trades,
            total_profit,
            average_profit: total_profit / num_trades as f64,
            win_rate: num_winning_trades as f64 / num_trades as f64,
            num_winning_trades,
            num_losing_trades: num_trades - num_winning_trades,
        }
    }
}
