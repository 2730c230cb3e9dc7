//! Unit tests for the moving-average zone path of the signal engine

use chrono::Utc;
use gridwatch::models::{FundConfig, FundState, SignalDirection, SignalSource, Zone};
use gridwatch::signals::engine::{Evaluation, Observation, SignalEngine};
use gridwatch::MonitorError;

use crate::common::{assert_close, zone_closes, zone_fund};

fn step_fund(fund: &FundConfig, state: &FundState, price: f64) -> Evaluation {
    SignalEngine::evaluate(
        fund,
        state,
        &Observation::with_closes(price, zone_closes()),
        Utc::now(),
    )
    .unwrap()
}

fn step(state: &FundState, price: f64) -> Evaluation {
    step_fund(&zone_fund(), state, price)
}

/// Walk through `prices`, returning the last evaluation
fn walk(prices: &[f64]) -> Evaluation {
    let mut state = FundState::default();
    let mut last = None;
    for &price in prices {
        let evaluation = step(&state, price);
        state = evaluation.state.clone();
        last = Some(evaluation);
    }
    last.unwrap()
}

#[test]
fn first_observation_records_zone_and_averages() {
    let evaluation = step(&FundState::default(), 0.875);

    assert!(evaluation.signals.is_empty());
    assert_eq!(evaluation.state.last_zone, Some(Zone::Accumulation));
    assert_eq!(evaluation.state.last_accumulation_step, Some(1));
    assert_close(evaluation.state.last_ma_short.unwrap(), 1.0);
    assert_close(evaluation.state.last_ma_long.unwrap(), 0.8);
}

#[test]
fn accumulation_adds_when_step_advances() {
    let evaluation = walk(&[0.875, 0.925]);

    assert_eq!(evaluation.signals.len(), 1);
    let signal = &evaluation.signals[0];
    assert_eq!(signal.direction, SignalDirection::Add);
    assert_eq!(signal.source, SignalSource::Accumulation(2));
    assert_eq!(signal.units, 1000);
    assert_close(signal.reference_price, 0.9);
    assert_eq!(signal.regime, "accumulation");
}

#[test]
fn rising_out_of_below_long_counts_every_step() {
    let evaluation = walk(&[0.70, 0.925]);

    assert_eq!(evaluation.signals.len(), 1);
    assert_eq!(evaluation.signals[0].units, 2000);
}

#[test]
fn no_adds_above_stop_threshold() {
    // long * 1.2 = 0.96
    let evaluation = walk(&[0.875, 0.975]);

    assert!(evaluation.signals.is_empty());
    assert_eq!(evaluation.state.last_accumulation_step, Some(3));
}

#[test]
fn falling_within_accumulation_is_silent() {
    let evaluation = walk(&[0.925, 0.875]);
    assert!(evaluation.signals.is_empty());
    assert_eq!(evaluation.state.last_accumulation_step, Some(1));
}

#[test]
fn below_long_suspends_signals() {
    let evaluation = walk(&[0.875, 0.70]);

    assert!(evaluation.signals.is_empty());
    assert_eq!(evaluation.state.last_zone, Some(Zone::BelowLong));
    assert_eq!(evaluation.state.last_accumulation_step, None);
    assert_eq!(evaluation.state.last_price, Some(0.70));
}

#[test]
fn entering_box_sets_baseline_cell() {
    let evaluation = walk(&[0.875, 1.045]);

    assert!(evaluation.signals.is_empty());
    assert_eq!(evaluation.state.last_zone, Some(Zone::Box));
    assert_eq!(evaluation.state.last_cell, Some(1));
}

#[test]
fn box_grid_trims_up_and_adds_down() {
    let up = walk(&[1.045, 1.105]);
    let sources: Vec<SignalSource> = up.signals.iter().map(|s| s.source).collect();
    assert_eq!(sources, vec![SignalSource::Box(2), SignalSource::Box(3)]);
    assert!(up
        .signals
        .iter()
        .all(|s| s.direction == SignalDirection::Trim && s.units == 500));
    assert_close(up.signals[0].reference_price, 1.06);

    let down = step(&up.state, 1.015);
    let sources: Vec<SignalSource> = down.signals.iter().map(|s| s.source).collect();
    assert_eq!(
        sources,
        vec![
            SignalSource::Box(2),
            SignalSource::Box(1),
            SignalSource::Box(0)
        ]
    );
    assert!(down
        .signals
        .iter()
        .all(|s| s.direction == SignalDirection::Add));
    assert_close(down.signals[2].reference_price, 1.0);
}

#[test]
fn rich_tier_blocks_box_adds() {
    let fund = zone_fund().with_dividend_yield(0.045);
    let first = step_fund(&fund, &FundState::default(), 1.105);
    let second = step_fund(&fund, &first.state, 1.015);

    assert!(second.signals.is_empty());
    assert_eq!(second.state.last_cell, Some(0));

    let third = step_fund(&fund, &second.state, 1.075);
    assert_eq!(third.signals.len(), 2);
    assert_eq!(third.signals[0].regime, "box, tier D (rich) (DY=4.5%)");
}

#[test]
fn entering_trend_trims_from_threshold_step() {
    let evaluation = walk(&[1.045, 1.265]);

    assert_eq!(evaluation.signals.len(), 1);
    let signal = &evaluation.signals[0];
    assert_eq!(signal.direction, SignalDirection::Trim);
    assert_eq!(signal.source, SignalSource::Trend(5));
    // threshold step 4 at 1.2 x short, so one step advanced
    assert_eq!(signal.units, 500);
    assert_close(signal.reference_price, 1.25);
    assert_eq!(evaluation.state.last_trend_step, Some(5));
    assert_eq!(evaluation.state.last_cell, None);
}

#[test]
fn entering_trend_at_threshold_step_is_silent() {
    // 1.21 sits in step 4, the same step as the 1.2 x short boundary
    let evaluation = walk(&[1.10, 1.21]);

    assert!(evaluation.signals.is_empty());
    assert_eq!(evaluation.state.last_zone, Some(Zone::Trend));
    assert_eq!(evaluation.state.last_trend_step, Some(4));
}

#[test]
fn trend_trims_on_further_rise_only() {
    let up = walk(&[1.265, 1.375]);
    assert_eq!(up.signals.len(), 1);
    assert_eq!(up.signals[0].source, SignalSource::Trend(7));
    assert_eq!(up.signals[0].units, 1000);
    assert_close(up.signals[0].reference_price, 1.35);

    let down = step(&up.state, 1.265);
    assert!(down.signals.is_empty());
    assert_eq!(down.state.last_trend_step, Some(5));
}

#[test]
fn missing_history_is_an_error() {
    let err = SignalEngine::evaluate(
        &zone_fund(),
        &FundState::default(),
        &Observation::price(1.0),
        Utc::now(),
    )
    .unwrap_err();
    assert!(matches!(err, MonitorError::InsufficientHistory { .. }));
}
