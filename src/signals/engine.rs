//! Signal engine: per fund, per tick orchestration of the classifiers,
//! grid indexer, crossing detector and position sizer.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::{MonitorError, Result};
use crate::metrics::Metrics;
use crate::models::{
    FundConfig, FundState, Signal, SignalDirection, SignalSource, StateMap, StrategyKind, Tier,
    Zone,
};
use crate::services::market_data::MarketDataProvider;

use super::grid::{detect_crossings, grid_index, grid_level};
use super::sizing::{direction_allowed, PositionSizer};
use super::tier::{classify_tier, TierDecision};
use super::zone::{classify_zone, trend_threshold_step, MovingAverages};

/// Inputs fetched for one fund in one tick
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub price: f64,
    /// Oldest-first closes; required by `MaZone` funds only
    pub closes: Option<Vec<f64>>,
}

impl Observation {
    pub fn price(price: f64) -> Self {
        Self {
            price,
            closes: None,
        }
    }

    pub fn with_closes(price: f64, closes: Vec<f64>) -> Self {
        Self {
            price,
            closes: Some(closes),
        }
    }
}

/// Result of evaluating one fund
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub state: FundState,
    pub signals: Vec<Signal>,
}

pub struct SignalEngine {
    funds: Vec<FundConfig>,
    metrics: Option<Arc<Metrics>>,
}

impl SignalEngine {
    pub fn new(funds: Vec<FundConfig>) -> Self {
        Self {
            funds,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn funds(&self) -> &[FundConfig] {
        &self.funds
    }

    /// Swap in a reloaded configuration; takes effect on the next tick
    pub fn replace_funds(&mut self, funds: Vec<FundConfig>) {
        self.funds = funds;
    }

    /// Run one tick over every configured fund, in configuration order.
    ///
    /// A fund whose inputs cannot be fetched or evaluated produces no signals
    /// and keeps its previous state; the remaining funds are still processed.
    pub async fn run_tick(
        &self,
        mut state: StateMap,
        provider: &dyn MarketDataProvider,
    ) -> (StateMap, Vec<Signal>) {
        let mut signals = Vec::new();

        for fund in &self.funds {
            let previous = state.get(&fund.name).cloned().unwrap_or_default();

            let outcome = match Self::observe(fund, provider).await {
                Ok(observation) => Self::evaluate(fund, &previous, &observation, Utc::now()),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(evaluation) => {
                    for signal in &evaluation.signals {
                        info!(
                            fund = %signal.fund,
                            symbol = %signal.symbol,
                            direction = %signal.direction,
                            source = %signal.source,
                            units = signal.units,
                            reference_price = signal.reference_price,
                            price = signal.current_price,
                            "Signal: {} {} units of {} at {}",
                            signal.direction,
                            signal.units,
                            signal.fund,
                            signal.source
                        );
                    }
                    state.insert(fund.name.clone(), evaluation.state);
                    signals.extend(evaluation.signals);
                }
                Err(e) => {
                    if let Some(ref metrics) = self.metrics {
                        metrics.fund_errors_total.inc();
                    }
                    if e.is_per_fund() {
                        warn!(
                            fund = %fund.name,
                            symbol = %fund.symbol,
                            error = %e,
                            "Skipping {} this tick: {}",
                            fund.name,
                            e
                        );
                    } else {
                        error!(
                            fund = %fund.name,
                            symbol = %fund.symbol,
                            error = %e,
                            "Unexpected error evaluating {}: {}",
                            fund.name,
                            e
                        );
                    }
                }
            }
        }

        (state, signals)
    }

    async fn observe(fund: &FundConfig, provider: &dyn MarketDataProvider) -> Result<Observation> {
        let price = provider.get_price(&fund.symbol).await?;
        if !price.is_finite() || price <= 0.0 {
            return Err(MonitorError::QuoteUnavailable {
                symbol: fund.symbol.clone(),
                reason: format!("unusable price {}", price),
            });
        }

        match fund.strategy {
            StrategyKind::YieldGrid => Ok(Observation::price(price)),
            StrategyKind::MaZone => {
                let closes = provider
                    .get_closes(&fund.symbol, fund.history_len())
                    .await?;
                Ok(Observation::with_closes(price, closes))
            }
        }
    }

    /// Evaluate one observation against the fund's previous state.
    ///
    /// Pure: no I/O, no clock. The first observation of a fund only records
    /// the baseline and never emits.
    pub fn evaluate(
        fund: &FundConfig,
        previous: &FundState,
        observation: &Observation,
        now: DateTime<Utc>,
    ) -> Result<Evaluation> {
        match fund.strategy {
            StrategyKind::YieldGrid => Ok(Self::evaluate_yield_grid(
                fund,
                previous,
                observation.price,
                now,
            )),
            StrategyKind::MaZone => {
                let closes = observation.closes.as_deref().unwrap_or(&[]);
                Self::evaluate_ma_zone(fund, previous, observation.price, closes, now)
            }
        }
    }

    fn evaluate_yield_grid(
        fund: &FundConfig,
        previous: &FundState,
        price: f64,
        now: DateTime<Utc>,
    ) -> Evaluation {
        let tier = classify_tier(fund);
        let cell = grid_index(price, fund.base_price, tier.spacing);

        let mut state = advance(previous, price, now);
        state.last_cell = Some(cell);
        state.last_zone = None;

        if !previous.is_initialized() {
            info!(
                fund = %fund.name,
                price = price,
                cell = cell,
                "{} first observation at {}, baseline recorded",
                fund.name,
                price
            );
            return Evaluation {
                state,
                signals: Vec::new(),
            };
        }

        // Re-index the last price under the current spacing and base so a
        // reloaded tier or base price never reads as a crossing
        let previous_cell = previous
            .last_price
            .map(|p| grid_index(p, fund.base_price, tier.spacing))
            .or(previous.last_cell);

        let units = PositionSizer::grid_units(fund);
        let mut signals = Vec::new();

        for crossing in detect_crossings(previous_cell, cell) {
            if !direction_allowed(&tier, crossing.direction) {
                debug!(
                    fund = %fund.name,
                    cell = crossing.cell,
                    direction = %crossing.direction,
                    tier = %tier.tier,
                    "Crossing suppressed by tier permissions"
                );
                continue;
            }
            if units == 0 {
                continue;
            }
            signals.push(Signal {
                fund: fund.name.clone(),
                symbol: fund.symbol.clone(),
                direction: crossing.direction,
                source: SignalSource::Grid(crossing.cell),
                reference_price: grid_level(fund.base_price, tier.spacing, crossing.cell),
                current_price: price,
                units,
                regime: regime_label(fund, &tier, None),
                timestamp: now,
            });
        }

        Evaluation { state, signals }
    }

    fn evaluate_ma_zone(
        fund: &FundConfig,
        previous: &FundState,
        price: f64,
        closes: &[f64],
        now: DateTime<Utc>,
    ) -> Result<Evaluation> {
        let averages = MovingAverages::from_closes(fund, closes)?;
        let zone = classify_zone(
            &fund.symbol,
            price,
            Some(averages.short),
            Some(averages.long),
        )?;
        let tier = classify_tier(fund);

        let mut state = advance(previous, price, now);
        state.last_zone = Some(zone);
        state.last_ma_short = Some(averages.short);
        state.last_ma_long = Some(averages.long);
        state.last_cell = None;
        state.last_accumulation_step = None;
        state.last_trend_step = None;

        let initialized = previous.is_initialized();
        let previous_zone = previous.last_zone;
        let regime = regime_label(fund, &tier, Some(zone));
        let mut signals = Vec::new();

        let signal = |direction: SignalDirection,
                      source: SignalSource,
                      reference_price: f64,
                      units: u64| Signal {
            fund: fund.name.clone(),
            symbol: fund.symbol.clone(),
            direction,
            source,
            reference_price,
            current_price: price,
            units,
            regime: regime.clone(),
            timestamp: now,
        };

        match zone {
            Zone::BelowLong => {}
            Zone::Accumulation => {
                let width = (averages.short - averages.long) * fund.zone.interval_pct;
                let step = ((price - averages.long) / width).floor() as i64;
                state.last_accumulation_step = Some(step);

                if initialized {
                    let previous_step = match previous_zone {
                        Some(Zone::Accumulation) => previous.last_accumulation_step.unwrap_or(step),
                        // Rising through the long MA counts from the floor
                        Some(Zone::BelowLong) => 0,
                        _ => step,
                    };
                    let advanced = step - previous_step;
                    let stop_above = averages.long * (1.0 + fund.zone.stop_add_above_pct);

                    if advanced > 0 && tier.can_buy && price <= stop_above {
                        let units = PositionSizer::accumulation_units(fund, advanced);
                        if units > 0 {
                            let level = averages.long + step as f64 * width;
                            signals.push(signal(
                                SignalDirection::Add,
                                SignalSource::Accumulation(step),
                                level,
                                units,
                            ));
                        }
                    }
                }
            }
            Zone::Box => {
                let spacing = fund.zone.box_grid_pct;
                let cell = grid_index(price, averages.short, spacing);
                state.last_cell = Some(cell);

                // Box cells are only comparable while the fund stays in the box
                if initialized && previous_zone == Some(Zone::Box) {
                    let units = PositionSizer::box_units(fund);
                    for crossing in detect_crossings(previous.last_cell, cell) {
                        if !direction_allowed(&tier, crossing.direction) || units == 0 {
                            continue;
                        }
                        signals.push(signal(
                            crossing.direction,
                            SignalSource::Box(crossing.cell),
                            grid_level(averages.short, spacing, crossing.cell),
                            units,
                        ));
                    }
                }
            }
            Zone::Trend => {
                let spacing = fund.zone.sell_trigger_up_pct;
                let step = grid_index(price, averages.short, spacing);
                state.last_trend_step = Some(step);

                if initialized {
                    let previous_step = match previous_zone {
                        Some(Zone::Trend) => previous.last_trend_step.unwrap_or(step),
                        Some(_) => trend_threshold_step(spacing),
                        None => step,
                    };
                    let difference = step - previous_step;

                    if difference > 0 && tier.can_sell {
                        let units = PositionSizer::trend_units(fund, difference);
                        if units > 0 {
                            signals.push(signal(
                                SignalDirection::Trim,
                                SignalSource::Trend(step),
                                grid_level(averages.short, spacing, step),
                                units,
                            ));
                        }
                    }
                }
            }
        }

        if !initialized {
            info!(
                fund = %fund.name,
                price = price,
                zone = %zone,
                ma_short = averages.short,
                ma_long = averages.long,
                "{} first observation at {} in {} zone, baseline recorded",
                fund.name,
                price,
                zone
            );
        } else if previous_zone != Some(zone) {
            info!(
                fund = %fund.name,
                from = ?previous_zone,
                to = %zone,
                "{} moved into {} zone",
                fund.name,
                zone
            );
        }

        Ok(Evaluation { state, signals })
    }
}

/// Carry the previous state forward with the new observation recorded
fn advance(previous: &FundState, price: f64, now: DateTime<Utc>) -> FundState {
    FundState {
        last_price: Some(price),
        tick: previous.tick + 1,
        updated_at: Some(now),
        ..previous.clone()
    }
}

fn regime_label(fund: &FundConfig, tier: &TierDecision, zone: Option<Zone>) -> String {
    let tier_label = match fund.dividend_yield {
        Some(dy) if tier.tier != Tier::Unknown => {
            format!("{} (DY={:.1}%)", tier.label(), dy * 100.0)
        }
        _ => tier.label().to_string(),
    };

    match (zone, tier.tier) {
        (None, _) => tier_label,
        (Some(zone), Tier::Unknown) => zone.label().to_string(),
        (Some(zone), _) => format!("{}, {}", zone.label(), tier_label),
    }
}
