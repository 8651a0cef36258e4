//! Return and risk ratios over an equity curve

/// Trading days per year used to de-annualize the risk-free rate
pub const TRADING_DAYS: f64 = 252.0;

/// Percentage return relative to the initial balance
pub fn return_percentage(equity: f64, initial_balance: f64) -> f64 {
    if initial_balance == 0.0 {
        return 0.0;
    }
    (equity - initial_balance) / initial_balance * 100.0
}

/// Natural log of equity over initial balance, 0 when either is non-positive
pub fn log_return(equity: f64, initial_balance: f64) -> f64 {
    if equity > 0.0 && initial_balance > 0.0 {
        (equity / initial_balance).ln()
    } else {
        0.0
    }
}

/// Absolute net exposure per unit of equity
pub fn portfolio_leverage(nop: f64, equity: f64) -> f64 {
    if equity == 0.0 {
        return 0.0;
    }
    nop.abs() / equity
}

/// Largest peak-to-trough decline in percent
pub fn max_drawdown(equity_history: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;

    for &equity in equity_history {
        if equity > peak {
            peak = equity;
        }
        // A non-positive peak has no meaningful relative drawdown
        if peak > 0.0 {
            let dd = (peak - equity) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd * 100.0
}

/// Step returns `(e[i+1] - e[i]) / e[i]`, skipping steps from zero equity
pub fn step_returns(equity_history: &[f64]) -> Vec<f64> {
    equity_history
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

/// Sortino ratio of the step returns of an equity curve.
///
/// Downside deviation is the population standard deviation of the
/// negative excess returns. Returns 0 with fewer than two negative samples
/// or a flat downside.
pub fn sortino_ratio(equity_history: &[f64], risk_free_rate: f64) -> f64 {
    if equity_history.len() <= 1 {
        return 0.0;
    }

    let per_step_rf = risk_free_rate / TRADING_DAYS;
    let excess: Vec<f64> = step_returns(equity_history)
        .into_iter()
        .map(|r| r - per_step_rf)
        .collect();
    if excess.is_empty() {
        return 0.0;
    }

    let negative: Vec<f64> = excess.iter().copied().filter(|r| *r < 0.0).collect();
    if negative.len() < 2 {
        return 0.0;
    }

    let downside = population_std(&negative);
    if downside == 0.0 {
        return 0.0;
    }

    mean(&excess) / downside
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std(values: &[f64]) -> f64 {
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
