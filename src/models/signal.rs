//! Rebalancing signal output

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalDirection {
    /// Price fell through a line: add to the position
    Add,
    /// Price rose through a line: trim the position
    Trim,
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalDirection::Add => f.write_str("add"),
            SignalDirection::Trim => f.write_str("trim"),
        }
    }
}

/// Which line or step produced a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum SignalSource {
    Grid(i64),
    Box(i64),
    Accumulation(i64),
    Trend(i64),
}

impl fmt::Display for SignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalSource::Grid(n) => write!(f, "grid {}", n),
            SignalSource::Box(n) => write!(f, "box grid {}", n),
            SignalSource::Accumulation(n) => write!(f, "accumulation step {}", n),
            SignalSource::Trend(n) => write!(f, "trend step {}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub fund: String,
    pub symbol: String,
    pub direction: SignalDirection,
    pub source: SignalSource,
    /// Price of the crossed line or reached step
    pub reference_price: f64,
    pub current_price: f64,
    /// Suggested units to add or trim, always > 0
    pub units: u64,
    /// Valuation tier or zone label at the time of the signal
    pub regime: String,
    pub timestamp: DateTime<Utc>,
}
