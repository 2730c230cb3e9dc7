//! Position sizing for crossings and zone moves

use crate::models::{FundConfig, SignalDirection};

use super::tier::TierDecision;

/// Whether the tier allows trading in `direction`
pub fn direction_allowed(tier: &TierDecision, direction: SignalDirection) -> bool {
    match direction {
        SignalDirection::Add => tier.can_buy,
        SignalDirection::Trim => tier.can_sell,
    }
}

fn floor_units(units: u64, pct: f64) -> u64 {
    let raw = (units as f64 * pct).floor();
    if raw.is_finite() && raw > 0.0 {
        raw as u64
    } else {
        0
    }
}

pub struct PositionSizer;

impl PositionSizer {
    /// Units per crossed yield-grid line
    pub fn grid_units(fund: &FundConfig) -> u64 {
        floor_units(fund.base_units, fund.step_pct)
    }

    /// Units per crossed box-grid line
    pub fn box_units(fund: &FundConfig) -> u64 {
        floor_units(fund.target_units, fund.zone.box_grid_units_pct)
    }

    /// Units to add after advancing `steps` accumulation steps.
    ///
    /// Capped so the holding never exceeds twice the target.
    pub fn accumulation_units(fund: &FundConfig, steps: i64) -> u64 {
        if steps <= 0 {
            return 0;
        }
        let wanted = floor_units(fund.target_units, fund.zone.add_pct * steps as f64);
        let cap = fund
            .target_units
            .saturating_mul(2)
            .saturating_sub(fund.base_units);
        wanted.min(cap)
    }

    /// Units to trim after the trend step rose by `step_difference`
    pub fn trend_units(fund: &FundConfig, step_difference: i64) -> u64 {
        if step_difference <= 0 {
            return 0;
        }
        floor_units(fund.target_units, fund.zone.sell_pct * step_difference as f64)
    }
}
