//! SMA (Simple Moving Average) indicator

use crate::models::indicators::SmaIndicator;

/// Calculate the SMA of the most recent `period` closes.
///
/// Closes are ordered oldest-first. Returns `None` when the series is shorter
/// than the window or the window contains a non-finite value.
pub fn calculate_sma(closes: &[f64], period: u32) -> Option<SmaIndicator> {
    let window = period as usize;
    if window == 0 || closes.len() < window {
        return None;
    }

    let tail = &closes[closes.len() - window..];
    if tail.iter().any(|c| !c.is_finite()) {
        return None;
    }

    let value = tail.iter().sum::<f64>() / window as f64;

    Some(SmaIndicator { value, period })
}
