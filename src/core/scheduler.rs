//! Tick scheduling: cron slots when the interval fits one, fixed deadlines otherwise

use cron::Schedule;
use std::str::FromStr;
use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

use crate::error::{MonitorError, Result};

/// Translate a polling interval into a cron expression.
///
/// Only intervals that divide a minute, an hour or a day evenly map onto
/// wall-clock slots; anything else returns `None`.
///
/// Cron format: second minute hour day month weekday
pub fn interval_to_cron(interval_seconds: u64) -> Option<String> {
    match interval_seconds {
        0 => None,
        s if s < 60 => (60 % s == 0).then(|| format!("*/{} * * * * *", s)),
        s if s < 3600 => {
            (s % 60 == 0 && 60 % (s / 60) == 0).then(|| format!("0 */{} * * * *", s / 60))
        }
        s if s < 86_400 => {
            (s % 3600 == 0 && 24 % (s / 3600) == 0).then(|| format!("0 0 */{} * * *", s / 3600))
        }
        _ => None,
    }
}

enum Cadence {
    Cron(Schedule),
    Fixed { next: Instant },
}

/// Wakes the monitor loop once per polling interval
pub struct TickScheduler {
    cadence: Cadence,
    interval_seconds: u64,
}

impl TickScheduler {
    pub fn new(interval_seconds: u64) -> Result<Self> {
        if interval_seconds == 0 {
            return Err(MonitorError::ConfigInvalid(
                "poll interval must be > 0".to_string(),
            ));
        }

        let cadence = match interval_to_cron(interval_seconds) {
            Some(cron_expr) => {
                let schedule = Schedule::from_str(&cron_expr).map_err(|e| {
                    MonitorError::ConfigInvalid(format!(
                        "invalid cron expression '{}': {}",
                        cron_expr, e
                    ))
                })?;
                info!(
                    interval = interval_seconds,
                    cron = %cron_expr,
                    "TickScheduler: every {}s (cron: {})",
                    interval_seconds,
                    cron_expr
                );
                Cadence::Cron(schedule)
            }
            None => {
                info!(
                    interval = interval_seconds,
                    "TickScheduler: every {}s from start (not a clock-aligned interval)",
                    interval_seconds
                );
                Cadence::Fixed {
                    next: Instant::now() + Duration::from_secs(interval_seconds),
                }
            }
        };

        Ok(Self {
            cadence,
            interval_seconds,
        })
    }

    pub fn interval_seconds(&self) -> u64 {
        self.interval_seconds
    }

    pub fn is_clock_aligned(&self) -> bool {
        matches!(self.cadence, Cadence::Cron(_))
    }

    /// Time until the next slot
    pub fn until_next(&self) -> Duration {
        match &self.cadence {
            Cadence::Cron(schedule) => {
                let now = chrono::Utc::now();
                match schedule.upcoming(chrono::Utc).next() {
                    Some(next_tick) if next_tick > now => {
                        (next_tick - now).to_std().unwrap_or_default()
                    }
                    Some(_) => Duration::ZERO,
                    None => Duration::from_secs(self.interval_seconds),
                }
            }
            Cadence::Fixed { next } => next.saturating_duration_since(Instant::now()),
        }
    }

    pub async fn wait_next(&mut self) {
        let interval = Duration::from_secs(self.interval_seconds);
        if let Cadence::Fixed { next } = &mut self.cadence {
            tokio::time::sleep_until(*next).await;
            // Skip slots missed by a tick that overran the interval
            let now = Instant::now();
            while *next <= now {
                *next += interval;
            }
            return;
        }

        tokio::time::sleep(self.until_next()).await;
    }
}
