//! Signal decision engine: tiers, zones, grid crossings and sizing.

pub mod engine;
pub mod grid;
pub mod sizing;
pub mod tier;
pub mod zone;

pub use engine::{Evaluation, Observation, SignalEngine};
pub use grid::{detect_crossings, grid_index, grid_level, Crossing};
pub use sizing::{direction_allowed, PositionSizer};
pub use tier::{classify_tier, TierDecision};
pub use zone::{classify_zone, trend_threshold_step, MovingAverages, TREND_MULTIPLIER};
