//! Profit-and-loss formulas
//!
//! Position sizes are price-denominated notionals: a leg of size `q` at
//! price `p` covers `q / p` units, so every PnL is the price delta times
//! `q / p`.

use crate::account::Side;

/// PnL realized by closing `quantity` of a position at `price`.
///
/// `closing_side` is the side of the closing leg: a sell closes a long,
/// a buy closes a short.
pub fn realized(closing_side: Side, avg_price: f64, price: f64, quantity: f64) -> f64 {
    match closing_side {
        Side::Sell => (price - avg_price) * (quantity / price),
        Side::Buy => (avg_price - price) * (quantity / price),
    }
}

/// Mark-to-market PnL of the open position at `spot_price`
pub fn unrealized(nop: f64, avg_price: f64, spot_price: f64) -> f64 {
    if nop == 0.0 || spot_price == 0.0 {
        return 0.0;
    }
    let units = nop.abs() / spot_price;
    if nop > 0.0 {
        (spot_price - avg_price) * units
    } else {
        (avg_price - spot_price) * units
    }
}

/// Flat proportional fee on a leg of size `volume`
pub fn trading_cost(fee_rate: f64, volume: f64) -> f64 {
    fee_rate * volume.abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realized_long_close() {
        // Closing a 1000 long opened at 50000 by selling at 51000
        let pnl = realized(Side::Sell, 50_000.0, 51_000.0, 1_000.0);
        assert!((pnl - 19.607_843_137).abs() < 1e-6);
    }

    #[test]
    fn test_realized_short_close() {
        let pnl = realized(Side::Buy, 50_000.0, 49_000.0, 1_000.0);
        assert!((pnl - 1_000.0 * 1_000.0 / 49_000.0).abs() < 1e-9);

        let loss = realized(Side::Buy, 50_000.0, 51_000.0, 1_000.0);
        assert!(loss < 0.0);
    }

    #[test]
    fn test_realized_at_entry_price_is_zero() {
        assert_eq!(realized(Side::Sell, 100.0, 100.0, 10.0), 0.0);
        assert_eq!(realized(Side::Buy, 100.0, 100.0, 10.0), 0.0);
    }

    #[test]
    fn test_unrealized() {
        assert_eq!(unrealized(0.0, 0.0, 50_000.0), 0.0);

        let long = unrealized(1_000.0, 50_000.0, 51_000.0);
        assert!((long - 1_000.0 * 1_000.0 / 51_000.0).abs() < 1e-9);

        let short = unrealized(-1_000.0, 50_000.0, 51_000.0);
        assert!((short + 1_000.0 * 1_000.0 / 51_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_unrealized_without_mark() {
        assert_eq!(unrealized(1_000.0, 50_000.0, 0.0), 0.0);
    }

    #[test]
    fn test_trading_cost() {
        assert_eq!(trading_cost(0.001, 1_000.0), 1.0);
        assert_eq!(trading_cost(0.001, -1_000.0), 1.0);
        assert_eq!(trading_cost(0.0, 1_000.0), 0.0);
    }
}
