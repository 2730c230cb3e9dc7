//! Per-fund configuration

use serde::{Deserialize, Serialize};

/// Which decision branch drives a fund
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Fixed grid around `base_price`, spacing picked from the dividend-yield tier
    #[default]
    YieldGrid,
    /// Moving-average zones: accumulation, box grid, trend scale-out
    MaZone,
}

/// Immutable configuration for one monitored fund
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundConfig {
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub strategy: StrategyKind,
    pub base_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<f64>,

    /// Spacing used when no dividend yield is configured
    #[serde(default = "default_grid_pct")]
    pub grid_pct: f64,
    /// Yield >= 7%
    #[serde(default = "default_grid_low")]
    pub grid_low: f64,
    /// 6% <= yield < 7%
    #[serde(default = "default_grid_mid")]
    pub grid_mid: f64,
    /// 5% <= yield < 6%
    #[serde(default = "default_grid_high")]
    pub grid_high: f64,
    /// Yield < 5%, sell side only
    #[serde(default = "default_grid_expensive")]
    pub grid_expensive: f64,

    #[serde(default)]
    pub base_units: u64,
    #[serde(default)]
    pub target_units: u64,
    /// Fraction of `base_units` suggested per crossed grid line
    #[serde(default = "default_step_pct")]
    pub step_pct: f64,

    #[serde(default = "default_ma_short")]
    pub ma_short: usize,
    #[serde(default = "default_ma_long")]
    pub ma_long: usize,
    #[serde(default)]
    pub zone: ZoneParams,

    /// Extra multiplier applied to the raw quote (some listings are quoted x10)
    #[serde(default = "default_price_scale")]
    pub price_scale: f64,
}

/// Parameters for the moving-average zone strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneParams {
    /// Width of one accumulation step as a fraction of (short MA - long MA)
    pub interval_pct: f64,
    /// Fraction of `target_units` added per accumulation step
    pub add_pct: f64,
    /// Fraction of `target_units` trimmed per trend step
    pub sell_pct: f64,
    /// Width of one trend step as a fraction of the short MA
    pub sell_trigger_up_pct: f64,
    /// Accumulation adds stop once price is this far above the long MA
    pub stop_add_above_pct: f64,
    /// Box grid spacing relative to the short MA
    pub box_grid_pct: f64,
    /// Fraction of `target_units` traded per box grid line
    pub box_grid_units_pct: f64,
}

impl Default for ZoneParams {
    fn default() -> Self {
        Self {
            interval_pct: 0.25,
            add_pct: 0.10,
            sell_pct: 0.05,
            sell_trigger_up_pct: 0.05,
            stop_add_above_pct: 0.15,
            box_grid_pct: 0.03,
            box_grid_units_pct: 0.05,
        }
    }
}

impl FundConfig {
    /// A yield-grid fund with default spacings
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, base_price: f64) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            strategy: StrategyKind::YieldGrid,
            base_price,
            dividend_yield: None,
            grid_pct: default_grid_pct(),
            grid_low: default_grid_low(),
            grid_mid: default_grid_mid(),
            grid_high: default_grid_high(),
            grid_expensive: default_grid_expensive(),
            base_units: 0,
            target_units: 0,
            step_pct: default_step_pct(),
            ma_short: default_ma_short(),
            ma_long: default_ma_long(),
            zone: ZoneParams::default(),
            price_scale: default_price_scale(),
        }
    }

    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_dividend_yield(mut self, dividend_yield: f64) -> Self {
        self.dividend_yield = Some(dividend_yield);
        self
    }

    pub fn with_units(mut self, base_units: u64, target_units: u64) -> Self {
        self.base_units = base_units;
        self.target_units = target_units;
        self
    }

    pub fn with_ma_windows(mut self, short: usize, long: usize) -> Self {
        self.ma_short = short;
        self.ma_long = long;
        self
    }

    pub fn with_zone(mut self, zone: ZoneParams) -> Self {
        self.zone = zone;
        self
    }

    /// Number of closes the zone strategy needs per tick
    pub fn history_len(&self) -> usize {
        self.ma_short.max(self.ma_long)
    }
}

fn default_grid_pct() -> f64 {
    0.04
}

fn default_grid_low() -> f64 {
    0.03
}

fn default_grid_mid() -> f64 {
    0.04
}

fn default_grid_high() -> f64 {
    0.05
}

fn default_grid_expensive() -> f64 {
    0.06
}

fn default_step_pct() -> f64 {
    0.01
}

fn default_ma_short() -> usize {
    150
}

fn default_ma_long() -> usize {
    300
}

fn default_price_scale() -> f64 {
    1.0
}
