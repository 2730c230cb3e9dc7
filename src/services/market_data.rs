//! Market data provider interface

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::{MonitorError, Result};

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Latest traded price for a symbol
    async fn get_price(&self, symbol: &str) -> Result<f64>;

    /// The most recent `count` daily closes, oldest first
    async fn get_closes(&self, symbol: &str, count: usize) -> Result<Vec<f64>>;
}

/// In-memory provider fed by hand. Useful for dry runs and tests.
#[derive(Default)]
pub struct StaticMarketDataProvider {
    prices: RwLock<HashMap<String, f64>>,
    closes: RwLock<HashMap<String, Vec<f64>>>,
}

impl StaticMarketDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_price(&self, symbol: &str, price: f64) {
        self.prices.write().await.insert(symbol.to_string(), price);
    }

    pub async fn clear_price(&self, symbol: &str) {
        self.prices.write().await.remove(symbol);
    }

    pub async fn set_closes(&self, symbol: &str, closes: Vec<f64>) {
        self.closes.write().await.insert(symbol.to_string(), closes);
    }
}

#[async_trait]
impl MarketDataProvider for StaticMarketDataProvider {
    async fn get_price(&self, symbol: &str) -> Result<f64> {
        self.prices
            .read()
            .await
            .get(symbol)
            .copied()
            .ok_or_else(|| MonitorError::QuoteUnavailable {
                symbol: symbol.to_string(),
                reason: "no price set".to_string(),
            })
    }

    async fn get_closes(&self, symbol: &str, count: usize) -> Result<Vec<f64>> {
        let closes = self.closes.read().await;
        let series = closes
            .get(symbol)
            .ok_or_else(|| MonitorError::HistoryUnavailable {
                symbol: symbol.to_string(),
                reason: "no history set".to_string(),
            })?;

        if series.len() < count {
            return Err(MonitorError::HistoryUnavailable {
                symbol: symbol.to_string(),
                reason: format!("requested {} bars, have {}", count, series.len()),
            });
        }

        Ok(series[series.len() - count..].to_vec())
    }
}
