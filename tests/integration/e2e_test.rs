//! End-to-end episode tests

use margin_sim::backtest::{EpisodeRunner, RandomPolicy, ScriptedPolicy, Termination};
use margin_sim::config::{Config, RunnerConfig, SimConfig};
use margin_sim::simulator::MarginTradeSimulator;
use margin_sim::source::{DataSource, ReplaySource};

fn runner(sim_config: SimConfig, runner_config: RunnerConfig) -> EpisodeRunner {
    let sim = MarginTradeSimulator::new(vec![], sim_config).unwrap();
    EpisodeRunner::new(sim, runner_config)
}

#[test]
fn test_random_episode_ends_flat() {
    let config = Config::default();
    let mut source = ReplaySource::synthetic(3_000, 17).unwrap();
    let mut policy = RandomPolicy::new(17);
    let mut runner = runner(config.simulator, config.runner);

    let outcome = runner.run(&mut source, &mut policy).unwrap();

    assert_eq!(outcome.final_account.nop, 0.0);
    assert!(outcome.steps > 0);
    assert!(outcome.final_account.equity.is_finite());
    assert!(
        (outcome.summary.net_pnl
            - (outcome.final_account.equity - outcome.summary.initial_balance))
            .abs()
            < 1e-6
    );
}

#[test]
fn test_goal_terminates_episode() {
    let runner_config = RunnerConfig {
        batch_interval: 1,
        ..RunnerConfig::default()
    };
    let mut runner = runner(SimConfig::default(), runner_config);
    let mut source = ReplaySource::from_prices(vec![100.0, 105.0, 110.0]).unwrap();
    // Half of equity at 100x: 5M notional, +5% move is ~+238%
    let mut policy = ScriptedPolicy::new(vec![150]);

    let outcome = runner.run(&mut source, &mut policy).unwrap();

    assert_eq!(outcome.termination, Termination::GoalReached);
    assert_eq!(outcome.steps, 2);
    assert!(runner.simulator().account().goal_reached);
    assert!(outcome.summary.return_pct > 120.0);
}

#[test]
fn test_drawdown_halt() {
    let sim_config = SimConfig {
        cut_loss: -90.0,
        ..SimConfig::default()
    };
    let runner_config = RunnerConfig {
        batch_interval: 1,
        hwm_drop: 0.10,
        ..RunnerConfig::default()
    };
    let mut runner = runner(sim_config, runner_config);
    let mut source = ReplaySource::from_prices(vec![100.0, 99.5, 99.0, 98.0]).unwrap();
    // 5M long at 100: a 0.5% drop costs ~25k of equity
    let mut policy = ScriptedPolicy::new(vec![150]);

    let outcome = runner.run(&mut source, &mut policy).unwrap();

    assert_eq!(outcome.termination, Termination::DrawdownHalt);
    assert_eq!(outcome.steps, 2);
    assert_eq!(outcome.final_account.nop, 0.0);
    assert_eq!(source.remaining(), 2);
}

#[test]
fn test_orders_forwarded_to_source() {
    let runner_config = RunnerConfig {
        batch_interval: 1,
        ..RunnerConfig::default()
    };
    let mut runner = runner(SimConfig::default(), runner_config);
    let mut source = ReplaySource::from_prices(vec![100.0; 5]).unwrap();
    let mut policy = ScriptedPolicy::new(vec![120, 100, 80]);

    runner.run(&mut source, &mut policy).unwrap();

    let orders = source.committed_orders();
    assert_eq!(orders.len(), 2);
    assert!(source.next_price().is_none());
}
