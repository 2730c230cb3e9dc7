//! Unit tests for the yield-grid path of the signal engine

use chrono::Utc;
use gridwatch::models::{FundState, SignalDirection, SignalSource};
use gridwatch::signals::engine::{Evaluation, Observation, SignalEngine};

use crate::common::{assert_close, grid_fund};

fn step(state: &FundState, price: f64) -> Evaluation {
    SignalEngine::evaluate(
        &grid_fund(Some(0.068)),
        state,
        &Observation::price(price),
        Utc::now(),
    )
    .unwrap()
}

#[test]
fn first_observation_records_baseline_only() {
    let evaluation = step(&FundState::default(), 1.30);

    assert!(evaluation.signals.is_empty());
    assert_eq!(evaluation.state.last_price, Some(1.30));
    assert_eq!(evaluation.state.last_cell, Some(4));
    assert_eq!(evaluation.state.tick, 1);
    assert!(evaluation.state.updated_at.is_some());
}

#[test]
fn staying_in_cell_updates_price_without_signals() {
    let first = step(&FundState::default(), 1.10);
    let second = step(&first.state, 1.12);

    assert!(second.signals.is_empty());
    assert_eq!(second.state.last_price, Some(1.12));
    assert_eq!(second.state.last_cell, Some(0));
    assert_eq!(second.state.tick, 2);
}

#[test]
fn gap_down_emits_one_add_per_line() {
    let first = step(&FundState::default(), 1.10);
    let second = step(&first.state, 0.95);

    let sources: Vec<SignalSource> = second.signals.iter().map(|s| s.source).collect();
    assert_eq!(
        sources,
        vec![
            SignalSource::Grid(-1),
            SignalSource::Grid(-2),
            SignalSource::Grid(-3),
            SignalSource::Grid(-4),
        ]
    );
    assert!(second
        .signals
        .iter()
        .all(|s| s.direction == SignalDirection::Add && s.units == 100));

    // Reference levels walk down from the previous price
    assert_close(second.signals[0].reference_price, 1.056);
    assert_close(second.signals[3].reference_price, 0.924);
    assert_eq!(second.state.last_cell, Some(-4));
}

#[test]
fn signals_carry_fund_identity_and_regime() {
    let first = step(&FundState::default(), 1.10);
    let second = step(&first.state, 1.145);

    let signal = &second.signals[0];
    assert_eq!(signal.fund, "HK Dividend ETF");
    assert_eq!(signal.symbol, "SH520890");
    assert_eq!(signal.regime, "tier B (value) (DY=6.8%)");
    assert_close(signal.current_price, 1.145);
}

#[test]
fn legacy_snapshot_without_cell_uses_last_price() {
    let legacy = FundState {
        last_price: Some(1.10),
        tick: 7,
        ..FundState::default()
    };

    let evaluation = step(&legacy, 1.145);
    assert_eq!(evaluation.signals.len(), 1);
    assert_eq!(evaluation.signals[0].source, SignalSource::Grid(1));
    assert_eq!(evaluation.state.tick, 8);
}

#[test]
fn zero_unit_crossings_are_dropped() {
    let fund = grid_fund(Some(0.068)).with_units(0, 0);
    let first = SignalEngine::evaluate(
        &fund,
        &FundState::default(),
        &Observation::price(1.10),
        Utc::now(),
    )
    .unwrap();
    let second =
        SignalEngine::evaluate(&fund, &first.state, &Observation::price(1.30), Utc::now()).unwrap();

    assert!(second.signals.is_empty());
    assert_eq!(second.state.last_cell, Some(4));
}

#[test]
fn rich_tier_still_trims_on_the_way_up() {
    let fund = grid_fund(Some(0.045));
    let first = SignalEngine::evaluate(
        &fund,
        &FundState::default(),
        &Observation::price(1.10),
        Utc::now(),
    )
    .unwrap();
    let second =
        SignalEngine::evaluate(&fund, &first.state, &Observation::price(1.20), Utc::now()).unwrap();

    // spacing 0.06: (1.20 / 1.10 - 1) / 0.06 = 1.52
    assert_eq!(second.signals.len(), 1);
    assert_eq!(second.signals[0].direction, SignalDirection::Trim);
    assert_eq!(second.signals[0].regime, "tier D (rich) (DY=4.5%)");
}

#[test]
fn tier_change_without_price_move_is_silent() {
    let before = grid_fund(Some(0.068));
    let first = SignalEngine::evaluate(
        &before,
        &FundState::default(),
        &Observation::price(1.21),
        Utc::now(),
    )
    .unwrap();
    assert_eq!(first.state.last_cell, Some(2));

    // Reloaded yield moves the fund to tier A, spacing 0.04 -> 0.03
    let after = grid_fund(Some(0.075));
    let second =
        SignalEngine::evaluate(&after, &first.state, &Observation::price(1.21), Utc::now())
            .unwrap();

    assert!(second.signals.is_empty());
    assert_eq!(second.state.last_cell, Some(3));
}

#[test]
fn base_price_change_without_price_move_is_silent() {
    let first = step(&FundState::default(), 1.13);

    let mut rebased = grid_fund(Some(0.068));
    rebased.base_price = 1.00;
    let second =
        SignalEngine::evaluate(&rebased, &first.state, &Observation::price(1.13), Utc::now())
            .unwrap();

    assert!(second.signals.is_empty());
    assert_eq!(second.state.last_cell, Some(3));
}

#[test]
fn unknown_tier_label_has_no_yield() {
    let fund = grid_fund(None);
    let first = SignalEngine::evaluate(
        &fund,
        &FundState::default(),
        &Observation::price(1.10),
        Utc::now(),
    )
    .unwrap();
    let second =
        SignalEngine::evaluate(&fund, &first.state, &Observation::price(1.145), Utc::now())
            .unwrap();

    assert_eq!(second.signals[0].regime, "unknown");
}
