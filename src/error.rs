//! Error taxonomy shared by the engine and its collaborators

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    /// Upstream quote payload had no usable price field
    #[error("quote unavailable for {symbol}: {reason}")]
    QuoteUnavailable { symbol: String, reason: String },

    /// History request failed, was malformed, or returned too few bars
    #[error("history unavailable for {symbol}: {reason}")]
    HistoryUnavailable { symbol: String, reason: String },

    /// A moving average could not be computed from the available closes
    #[error("insufficient history for {symbol}: need {required} closes, have {available}")]
    InsufficientHistory {
        symbol: String,
        required: usize,
        available: usize,
    },

    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("state I/O error: {0}")]
    StateIO(String),

    #[error("notification failed: {0}")]
    Notify(String),
}

impl MonitorError {
    /// Errors scoped to a single fund within one tick
    pub fn is_per_fund(&self) -> bool {
        matches!(
            self,
            MonitorError::QuoteUnavailable { .. }
                | MonitorError::HistoryUnavailable { .. }
                | MonitorError::InsufficientHistory { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;
