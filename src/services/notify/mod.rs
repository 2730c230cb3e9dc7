//! Notification delivery and message formatting

pub mod pushplus;

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::models::{Signal, SignalDirection};

pub use pushplus::PushPlusNotifier;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one message. Single attempt, no retry.
    async fn send(&self, text: &str) -> Result<()>;
}

/// Writes messages to the log instead of pushing them anywhere
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        info!(message = %text, "Notification (no push token configured)");
        Ok(())
    }
}

/// Human-readable text for one signal
pub fn format_signal(signal: &Signal) -> String {
    let (action, level_label) = match signal.direction {
        SignalDirection::Add => ("ADD", "reference buy price"),
        SignalDirection::Trim => ("TRIM", "reference sell price"),
    };

    format!(
        "{} ({}) {} signal:\n- line: {}\n- {}: {:.4}\n- current price: {:.4}\n- suggested units: {}\n- regime: {}\n- time: {}",
        signal.fund,
        signal.symbol,
        action,
        signal.source,
        level_label,
        signal.reference_price,
        signal.current_price,
        signal.units,
        signal.regime,
        signal.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

/// One message for a whole tick; `None` when there is nothing to send
pub fn format_batch(signals: &[Signal]) -> Option<String> {
    if signals.is_empty() {
        return None;
    }
    Some(
        signals
            .iter()
            .map(format_signal)
            .collect::<Vec<_>>()
            .join("\n\n"),
    )
}
