//! Moving-average zone classification

use crate::error::{MonitorError, Result};
use crate::indicators::trend::calculate_sma;
use crate::models::{FundConfig, Zone};

/// Price at or above `short MA * TREND_MULTIPLIER` is trend territory
pub const TREND_MULTIPLIER: f64 = 1.2;

/// Absorbs representation error when a boundary is itself a grid line
const STEP_EPSILON: f64 = 1e-9;

/// Trend step of the `short MA * TREND_MULTIPLIER` boundary.
///
/// `(1.2 - 1) / 0.05` evaluates to 3.999..., so a plain floor lands one step
/// below the boundary.
pub fn trend_threshold_step(spacing: f64) -> i64 {
    ((TREND_MULTIPLIER - 1.0) / spacing + STEP_EPSILON).floor() as i64
}

/// Short and long moving averages for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingAverages {
    pub short: f64,
    pub long: f64,
}

impl MovingAverages {
    /// Compute both averages from oldest-first closes.
    pub fn from_closes(fund: &FundConfig, closes: &[f64]) -> Result<Self> {
        let short = calculate_sma(closes, fund.ma_short as u32);
        let long = calculate_sma(closes, fund.ma_long as u32);

        match (short, long) {
            (Some(short), Some(long)) => Ok(Self {
                short: short.value,
                long: long.value,
            }),
            _ => Err(MonitorError::InsufficientHistory {
                symbol: fund.symbol.clone(),
                required: fund.history_len(),
                available: closes.len(),
            }),
        }
    }
}

/// Classify price against the two averages, first match wins.
///
/// Either average missing means there is not enough history to decide.
pub fn classify_zone(
    symbol: &str,
    price: f64,
    ma_short: Option<f64>,
    ma_long: Option<f64>,
) -> Result<Zone> {
    let (Some(short), Some(long)) = (ma_short, ma_long) else {
        return Err(MonitorError::InsufficientHistory {
            symbol: symbol.to_string(),
            required: 0,
            available: 0,
        });
    };

    let zone = if price <= long {
        Zone::BelowLong
    } else if price < short {
        Zone::Accumulation
    } else if price < short * TREND_MULTIPLIER {
        Zone::Box
    } else {
        Zone::Trend
    };

    Ok(zone)
}
