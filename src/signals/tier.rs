//! Dividend-yield tier classification

use crate::models::{FundConfig, Tier};

pub const TIER_A_MIN_YIELD: f64 = 0.07;
pub const TIER_B_MIN_YIELD: f64 = 0.06;
pub const TIER_C_MIN_YIELD: f64 = 0.05;

/// Grid spacing and trade permissions for the fund's current tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierDecision {
    pub tier: Tier,
    pub spacing: f64,
    pub can_buy: bool,
    pub can_sell: bool,
}

impl TierDecision {
    pub fn label(&self) -> &'static str {
        self.tier.label()
    }
}

/// Classify a fund by its configured dividend yield.
///
/// Rules are checked top to bottom and the first match wins. Not cached:
/// the configuration may be swapped between ticks.
pub fn classify_tier(fund: &FundConfig) -> TierDecision {
    let Some(dy) = fund.dividend_yield else {
        return TierDecision {
            tier: Tier::Unknown,
            spacing: fund.grid_pct,
            can_buy: true,
            can_sell: true,
        };
    };

    match dy {
        dy if dy >= TIER_A_MIN_YIELD => TierDecision {
            tier: Tier::A,
            spacing: fund.grid_low,
            can_buy: true,
            can_sell: true,
        },
        dy if dy >= TIER_B_MIN_YIELD => TierDecision {
            tier: Tier::B,
            spacing: fund.grid_mid,
            can_buy: true,
            can_sell: true,
        },
        dy if dy >= TIER_C_MIN_YIELD => TierDecision {
            tier: Tier::C,
            spacing: fund.grid_high,
            can_buy: true,
            can_sell: true,
        },
        // Rich: wider grid, no new buying
        _ => TierDecision {
            tier: Tier::D,
            spacing: fund.grid_expensive,
            can_buy: false,
            can_sell: true,
        },
    }
}
