//! Trade execution state machine
//!
//! Long and short are the same operation with opposite sides: a buy adds to
//! a long or reduces a short, a sell does the reverse. An order larger than
//! the opposing position closes it and opens the remainder the other way.

use crate::account::{PositionAccount, Side};
use crate::ledger::{TradeLedger, TradeRecord};
use crate::risk::pnl;

/// Execute one order of `volume` on `side` at `price`.
///
/// Returns the number of trade legs recorded.
pub(crate) fn trade(
    account: &mut PositionAccount,
    ledger: &mut TradeLedger,
    fee_rate: f64,
    side: Side,
    price: f64,
    volume: f64,
) -> usize {
    if volume == 0.0 {
        hold(account, price);
        return 0;
    }

    let opposing = account.nop * side.sign() < 0.0;
    let legs = if !opposing {
        open_leg(account, ledger, fee_rate, side, price, volume);
        1
    } else {
        let open = account.nop.abs();
        if volume < open {
            close_leg(account, ledger, fee_rate, side, price, volume);
            1
        } else if volume == open {
            close_leg(account, ledger, fee_rate, side, price, open);
            1
        } else {
            close_leg(account, ledger, fee_rate, side, price, open);
            open_leg(account, ledger, fee_rate, side, price, volume - open);
            2
        }
    };

    mark(account, price);
    legs
}

/// Mark the open position at `price` without trading
pub(crate) fn hold(account: &mut PositionAccount, price: f64) {
    mark(account, price);
}

fn mark(account: &mut PositionAccount, price: f64) {
    account.spot_price = price;
    account.unrealized_pnl = pnl::unrealized(account.nop, account.avg_price, price);
}

/// Open or extend a position in the direction of `side`
fn open_leg(
    account: &mut PositionAccount,
    ledger: &mut TradeLedger,
    fee_rate: f64,
    side: Side,
    price: f64,
    quantity: f64,
) {
    let held = account.nop.abs();
    account.avg_price = if held == 0.0 {
        price
    } else {
        (account.avg_price * held + price * quantity) / (held + quantity)
    };
    account.nop += side.sign() * quantity;

    let cost = pnl::trading_cost(fee_rate, quantity);
    account.charge(cost);
    ledger.push_trade(TradeRecord {
        time: account.timestep,
        side,
        price,
        quantity,
        trade_profit: 0.0,
        trade_cost: cost,
    });
}

/// Reduce the opposing position by `quantity`, realizing its PnL
fn close_leg(
    account: &mut PositionAccount,
    ledger: &mut TradeLedger,
    fee_rate: f64,
    side: Side,
    price: f64,
    quantity: f64,
) {
    let profit = pnl::realized(side, account.avg_price, price, quantity);
    let cost = pnl::trading_cost(fee_rate, quantity);

    account.realize(profit);
    account.charge(cost);

    if quantity == account.nop.abs() {
        account.nop = 0.0;
        account.avg_price = 0.0;
    } else {
        account.nop += side.sign() * quantity;
    }

    ledger.push_trade(TradeRecord {
        time: account.timestep,
        side,
        price,
        quantity,
        trade_profit: profit,
        trade_cost: cost,
    });
}
