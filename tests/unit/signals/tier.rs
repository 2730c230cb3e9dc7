use gridwatch::models::Tier;
use gridwatch::signals::tier::classify_tier;

use crate::common::{assert_close, grid_fund};

#[test]
fn high_yield_is_tier_a_with_tight_grid() {
    let decision = classify_tier(&grid_fund(Some(0.08)));
    assert_eq!(decision.tier, Tier::A);
    assert_close(decision.spacing, 0.03);
    assert!(decision.can_buy);
    assert!(decision.can_sell);
}

#[test]
fn thresholds_are_inclusive() {
    assert_eq!(classify_tier(&grid_fund(Some(0.07))).tier, Tier::A);
    assert_eq!(classify_tier(&grid_fund(Some(0.06))).tier, Tier::B);
    assert_eq!(classify_tier(&grid_fund(Some(0.05))).tier, Tier::C);
}

#[test]
fn yield_between_six_and_seven_percent_uses_mid_spacing() {
    let decision = classify_tier(&grid_fund(Some(0.068)));
    assert_eq!(decision.tier, Tier::B);
    assert_close(decision.spacing, 0.04);
}

#[test]
fn fair_yield_uses_high_spacing() {
    let decision = classify_tier(&grid_fund(Some(0.055)));
    assert_eq!(decision.tier, Tier::C);
    assert_close(decision.spacing, 0.05);
    assert!(decision.can_buy);
}

#[test]
fn rich_valuation_disables_buying() {
    let decision = classify_tier(&grid_fund(Some(0.045)));
    assert_eq!(decision.tier, Tier::D);
    assert_close(decision.spacing, 0.06);
    assert!(!decision.can_buy);
    assert!(decision.can_sell);
}

#[test]
fn missing_yield_falls_back_to_default_spacing() {
    let mut fund = grid_fund(None);
    fund.grid_pct = 0.035;

    let decision = classify_tier(&fund);
    assert_eq!(decision.tier, Tier::Unknown);
    assert_close(decision.spacing, 0.035);
    assert!(decision.can_buy && decision.can_sell);
    assert_eq!(decision.label(), "unknown");
}
