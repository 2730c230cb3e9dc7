//! Unit tests for SMA indicator

use gridwatch::indicators::trend::calculate_sma;

#[test]
fn sma_averages_most_recent_window() {
    let closes = vec![10.0, 20.0, 30.0, 40.0];
    let sma = calculate_sma(&closes, 2).unwrap();
    assert_eq!(sma.value, 35.0);
    assert_eq!(sma.period, 2);
}

#[test]
fn sma_over_full_series() {
    let closes = vec![1.0, 2.0, 3.0, 4.0];
    assert_eq!(calculate_sma(&closes, 4).unwrap().value, 2.5);
}

#[test]
fn sma_requires_enough_data() {
    assert!(calculate_sma(&[1.0, 2.0], 3).is_none());
    assert!(calculate_sma(&[], 1).is_none());
}

#[test]
fn sma_rejects_zero_window() {
    assert!(calculate_sma(&[1.0, 2.0], 0).is_none());
}

#[test]
fn sma_rejects_non_finite_closes_in_window() {
    assert!(calculate_sma(&[1.0, f64::NAN, 3.0], 2).is_none());
    // NaN outside the window is ignored
    assert_eq!(calculate_sma(&[f64::NAN, 2.0, 4.0], 2).unwrap().value, 3.0);
}
