//! Persisted per-fund state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::regime::Zone;

/// Fund name -> state. Ordered so snapshots diff cleanly between runs.
pub type StateMap = BTreeMap<String, FundState>;

/// Everything the engine remembers about a fund between ticks.
///
/// Every field defaults, so snapshots that only carry `last_price` and
/// `tick` still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundState {
    /// `None` until the first successful observation
    pub last_price: Option<f64>,
    /// Yield-grid cell, or the box cell while an MA-zone fund sits in `Box`
    pub last_cell: Option<i64>,
    pub last_zone: Option<Zone>,
    pub tick: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_ma_short: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_ma_long: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_accumulation_step: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_trend_step: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl FundState {
    pub fn is_initialized(&self) -> bool {
        self.last_price.is_some()
    }
}
