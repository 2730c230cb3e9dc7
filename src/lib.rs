//! ETF grid and moving-average zone monitor.
//!
//! Polls quotes for a configured set of funds, turns price moves into
//! ordered add/trim signals, and persists the state needed to detect
//! transitions between ticks.

pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;

pub use error::{MonitorError, Result};
