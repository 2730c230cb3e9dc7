//! Grid indexing and boundary-crossing detection

use crate::models::SignalDirection;

/// Cell `n` such that `price ~= reference * (1 + n * spacing)`.
///
/// `spacing > 0` is guaranteed by configuration loading.
pub fn grid_index(price: f64, reference: f64, spacing: f64) -> i64 {
    ((price / reference - 1.0) / spacing).floor() as i64
}

/// Price of grid line `n`
pub fn grid_level(reference: f64, spacing: f64, n: i64) -> f64 {
    reference * (1.0 + n as f64 * spacing)
}

/// One grid line crossed between two observations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub cell: i64,
    pub direction: SignalDirection,
}

/// Every line crossed moving from `previous` to `current`, closest first.
///
/// Rising crossings are trims, falling crossings are adds. No previous cell
/// (first observation) or an unchanged cell yields nothing.
pub fn detect_crossings(previous: Option<i64>, current: i64) -> Vec<Crossing> {
    let Some(previous) = previous else {
        return Vec::new();
    };

    if current > previous {
        (previous + 1..=current)
            .map(|cell| Crossing {
                cell,
                direction: SignalDirection::Trim,
            })
            .collect()
    } else if current < previous {
        (current..previous)
            .rev()
            .map(|cell| Crossing {
                cell,
                direction: SignalDirection::Add,
            })
            .collect()
    } else {
        Vec::new()
    }
}
