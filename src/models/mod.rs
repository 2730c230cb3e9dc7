//! Shared data models spanning the engine layers.

pub mod fund;
pub mod indicators;
pub mod regime;
pub mod signal;
pub mod state;

pub use fund::{FundConfig, StrategyKind, ZoneParams};
pub use indicators::SmaIndicator;
pub use regime::{Tier, Zone};
pub use signal::{Signal, SignalDirection, SignalSource};
pub use state::{FundState, StateMap};
