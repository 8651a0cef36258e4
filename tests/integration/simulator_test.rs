//! Simulator behaviour tests

use margin_sim::account::Action;
use margin_sim::config::SimConfig;
use margin_sim::simulator::MarginTradeSimulator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EPS: f64 = 1e-6;

fn simulator() -> MarginTradeSimulator {
    MarginTradeSimulator::new(vec![], SimConfig::default()).unwrap()
}

fn assert_invariants(sim: &MarginTradeSimulator) {
    let account = sim.account();
    let info = sim.account_info();

    if account.nop == 0.0 {
        assert_eq!(account.avg_price, 0.0, "flat account keeps an entry price");
        assert_eq!(account.unrealized_pnl, 0.0, "flat account has floating PnL");
    } else {
        assert!(account.avg_price > 0.0, "open position without entry price");
    }

    assert!((account.equity - (account.balance + account.unrealized_pnl)).abs() < EPS);
    assert!((account.margin_required - account.nop.abs() / account.leverage).abs() < EPS);

    if account.margin_required == 0.0 {
        assert_eq!(info.margin_level, 100.0);
    } else {
        let expected = account.equity / account.margin_required * 100.0;
        assert!((info.margin_level - expected).abs() < EPS);
    }

    for value in [
        info.equity,
        info.margin_level,
        info.portfolio_leverage,
        info.return_percentage,
        info.log_return,
        info.max_drawdown,
        info.sortino_ratio,
        info.reward,
    ] {
        assert!(value.is_finite());
    }
}

#[test]
fn test_open_scenario() {
    let mut sim = simulator();
    sim.execute(Action::Long, 50_000.0, 1_000.0).unwrap();

    let info = sim.account_info();
    assert_eq!(info.nop, 1_000.0);
    assert_eq!(info.margin_required, 10.0);
    assert!((info.accumulated_cost - 0.8).abs() < EPS);
    assert!((info.equity - 99_999.2).abs() < EPS);
    assert_invariants(&sim);
}

#[test]
fn test_flip_scenario() {
    let mut sim = simulator();
    sim.execute(Action::Long, 50_000.0, 1_000.0).unwrap();
    sim.execute(Action::Short, 51_000.0, 1_500.0).unwrap();

    let account = sim.account();
    assert_eq!(account.nop, -500.0);
    assert_eq!(account.avg_price, 51_000.0);
    assert!((account.realized_pnl - 19.607_843).abs() < EPS);

    let expected_balance = 100_000.0 - 0.8 + 1_000.0 * 1_000.0 / 51_000.0 - 0.8 - 0.4;
    assert!((account.balance - expected_balance).abs() < EPS);
    assert!((account.accumulated_cost - 2.0).abs() < EPS);

    assert_eq!(sim.done_trades().len(), 3);
    assert!((sim.ledger().net_quantity() - account.nop).abs() < EPS);
    assert_invariants(&sim);
}

#[test]
fn test_stop_out_scenario() {
    let mut sim = simulator();
    sim.execute(Action::Long, 50_000.0, 1_000_000.0).unwrap();

    assert!(sim.check_stopped_out(48_000.0).unwrap());

    let account = sim.account();
    assert!(account.stopped_out);
    assert_eq!(account.nop, 0.0);
    assert!(sim.account_info().return_percentage < -25.0);
    assert_invariants(&sim);

    // Sticky until reset
    sim.execute(Action::Hold, 48_000.0, 0.0).unwrap();
    assert!(sim.account().stopped_out);
    sim.reset();
    assert!(!sim.account().stopped_out);
}

#[test]
fn test_margin_rejection_scenario() {
    let mut sim = simulator();
    sim.execute(Action::Long, 50_000.0, 1_000.0).unwrap();

    let report = sim.execute(Action::Long, 50_000.0, 20_000_000.0).unwrap();

    assert!(!report.executed);
    assert!(sim.account().trade_not_executed);
    assert_eq!(sim.account().nop, 1_000.0);
    assert_eq!(sim.done_trades().len(), 1);
    assert_invariants(&sim);
}

#[test]
fn test_round_trip_at_constant_price() {
    let mut sim = simulator();
    sim.execute(Action::Short, 1.25, 40_000.0).unwrap();
    sim.close(1.25).unwrap();

    let account = sim.account();
    assert_eq!(account.nop, 0.0);
    assert_eq!(account.realized_pnl, 0.0);
    let fees = 2.0 * 0.0008 * 40_000.0;
    assert!((account.balance - (100_000.0 - fees)).abs() < EPS);
    assert!((account.equity - account.balance).abs() < EPS);
    assert_invariants(&sim);
}

#[test]
fn test_close_is_idempotent() {
    let mut sim = simulator();
    sim.execute(Action::Long, 100.0, 5_000.0).unwrap();
    sim.close(101.0).unwrap();

    let after_first = sim.account().clone();
    let records = sim.record().len();

    sim.close(101.0).unwrap();
    sim.close(99.0).unwrap();

    assert_eq!(sim.account(), &after_first);
    assert_eq!(sim.record().len(), records);
}

#[test]
fn test_margin_gate_boundary() {
    let config = SimConfig {
        stop_out_level: 200.0,
        ..SimConfig::default()
    };
    let mut sim = MarginTradeSimulator::new(vec![], config.clone()).unwrap();

    // Post-trade level lands exactly on the stop-out level
    let report = sim.execute(Action::Long, 100.0, 5_000_000.0).unwrap();
    assert!(report.executed);

    let mut sim = MarginTradeSimulator::new(vec![], config).unwrap();
    let report = sim.execute(Action::Long, 100.0, 5_000_100.0).unwrap();
    assert!(!report.executed);
}

#[test]
fn test_snapshot_per_call() {
    let mut sim = simulator();
    sim.execute(Action::Long, 100.0, 1_000.0).unwrap();
    sim.execute(Action::Hold, 101.0, 0.0).unwrap();
    sim.check_goal(101.0).unwrap();
    sim.close(102.0).unwrap();

    let record = sim.record();
    assert_eq!(record.len(), 3);
    assert_eq!(record[1].spot_price, 101.0);
    assert_eq!(record[2].nop, 0.0);
    assert_eq!(record[2].reward, sim.account_info().reward);
}

#[test]
fn test_snapshot_serializes_all_fields() {
    let mut sim = simulator();
    sim.execute(Action::Long, 100.0, 1_000.0).unwrap();

    let json = serde_json::to_value(&sim.record()[0]).unwrap();
    for field in [
        "timecount",
        "timestamp",
        "equity",
        "margin_level",
        "sortino_ratio",
        "reward",
        "avg_price",
        "trade_not_executed",
        "stopped_out",
        "goal_reached",
    ] {
        assert!(json.get(field).is_some(), "missing {}", field);
    }

    let trade = serde_json::to_value(&sim.done_trades()[0]).unwrap();
    assert_eq!(trade["side"], "buy");
}

#[test]
fn test_invariants_under_random_operations() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut sim = simulator();
    let mut price: f64 = 100.0;
    let mut last_cost = 0.0;

    for _ in 0..2_000 {
        price *= 1.0 + rng.gen_range(-0.01..0.01);
        let action: u8 = rng.gen_range(0..3);
        let volume = rng.gen_range(0.0..2_000_000.0_f64).floor();

        match rng.gen_range(0..10) {
            0 => sim.close(price).unwrap(),
            1 => {
                sim.check_goal(price).unwrap();
            }
            2 => {
                sim.check_stopped_out(price).unwrap();
            }
            _ => {
                sim.execute(action, price, volume).unwrap();
            }
        }

        assert_invariants(&sim);
        assert!(sim.account().accumulated_cost >= last_cost);
        last_cost = sim.account().accumulated_cost;
        assert!((sim.ledger().net_quantity() - sim.account().nop).abs() < 1e-3);
    }
}
