//! Valuation tiers and moving-average zones

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dividend-yield valuation bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Unknown,
    A,
    B,
    C,
    D,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Unknown => "unknown",
            Tier::A => "tier A (deep value)",
            Tier::B => "tier B (value)",
            Tier::C => "tier C (fair)",
            Tier::D => "tier D (rich)",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Trend regime derived from price vs. the short and long moving averages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Zone {
    /// At or under the long MA: all position actions suspended
    BelowLong,
    /// Between the long and short MA: building the base position
    Accumulation,
    /// Short MA up to 1.2x short MA: range-bound grid trading
    Box,
    /// 1.2x short MA and above: scale-out only
    Trend,
}

impl Zone {
    pub fn label(&self) -> &'static str {
        match self {
            Zone::BelowLong => "below long MA (capital preservation)",
            Zone::Accumulation => "accumulation",
            Zone::Box => "box",
            Zone::Trend => "trend",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
