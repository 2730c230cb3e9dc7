//! Eastmoney quote and daily-kline provider

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::error::{MonitorError, Result};
use crate::services::market_data::MarketDataProvider;

pub const DEFAULT_QUOTE_URL: &str = "https://push2.eastmoney.com";
pub const DEFAULT_HISTORY_URL: &str = "https://push2his.eastmoney.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const USER_AGENT: &str = "Mozilla/5.0";
const REFERER: &str = "https://quote.eastmoney.com/";

/// Map `SH515080` / `SZ159920` / `515080` to Eastmoney's `market.code` id.
/// Bare codes are assumed to be Shanghai listings.
pub fn secid(symbol: &str) -> String {
    let symbol = symbol.trim().to_uppercase();
    if let Some(code) = symbol.strip_prefix("SH") {
        format!("1.{}", code)
    } else if let Some(code) = symbol.strip_prefix("SZ") {
        format!("0.{}", code)
    } else {
        format!("1.{}", symbol)
    }
}

pub struct EastmoneyProvider {
    client: reqwest::Client,
    quote_url: String,
    history_url: String,
    price_scales: HashMap<String, f64>,
}

impl EastmoneyProvider {
    pub fn new() -> Self {
        Self::with_client(
            DEFAULT_QUOTE_URL.to_string(),
            DEFAULT_HISTORY_URL.to_string(),
            reqwest::Client::new(),
        )
    }

    pub fn with_client(quote_url: String, history_url: String, client: reqwest::Client) -> Self {
        Self {
            client,
            quote_url: quote_url.trim_end_matches('/').to_string(),
            history_url: history_url.trim_end_matches('/').to_string(),
            price_scales: HashMap::new(),
        }
    }

    /// Per-symbol multipliers applied after the usual /100 quote conversion
    pub fn with_price_scales<I>(mut self, scales: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        self.price_scales = scales
            .into_iter()
            .map(|(symbol, scale)| (symbol.trim().to_uppercase(), scale))
            .collect();
        self
    }

    async fn get_json(&self, url: &str) -> std::result::Result<Value, reqwest::Error> {
        self.client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::REFERER, REFERER)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await
    }
}

impl Default for EastmoneyProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the close column from `date,open,close,...` kline rows
pub fn parse_kline_closes(symbol: &str, body: &Value) -> Result<Vec<f64>> {
    let malformed = |reason: String| MonitorError::HistoryUnavailable {
        symbol: symbol.to_string(),
        reason,
    };

    let rows = body
        .get("data")
        .and_then(|d| d.get("klines"))
        .and_then(|k| k.as_array())
        .ok_or_else(|| malformed("payload has no klines".to_string()))?;

    rows.iter()
        .map(|row| {
            let row = row
                .as_str()
                .ok_or_else(|| malformed(format!("kline row is not a string: {}", row)))?;
            row.split(',')
                .nth(2)
                .and_then(|close| close.trim().parse::<f64>().ok())
                .filter(|close| close.is_finite())
                .ok_or_else(|| malformed(format!("unparseable kline row: {}", row)))
        })
        .collect()
}

#[async_trait]
impl MarketDataProvider for EastmoneyProvider {
    async fn get_price(&self, symbol: &str) -> Result<f64> {
        let url = format!(
            "{}/api/qt/stock/get?secid={}&fields=f43",
            self.quote_url,
            secid(symbol)
        );

        let body = self
            .get_json(&url)
            .await
            .map_err(|e| MonitorError::QuoteUnavailable {
                symbol: symbol.to_string(),
                reason: e.to_string(),
            })?;

        let raw = body
            .get("data")
            .and_then(|d| d.get("f43"))
            .and_then(Value::as_f64)
            .filter(|raw| *raw != 0.0)
            .ok_or_else(|| MonitorError::QuoteUnavailable {
                symbol: symbol.to_string(),
                reason: format!("empty quote payload: {}", body),
            })?;

        let scale = self
            .price_scales
            .get(&symbol.trim().to_uppercase())
            .copied()
            .unwrap_or(1.0);
        let price = ((raw / 100.0 * scale) * 1000.0).round() / 1000.0;

        debug!(symbol = %symbol, raw = raw, price = price, "Quote for {}: {}", symbol, price);
        Ok(price)
    }

    async fn get_closes(&self, symbol: &str, count: usize) -> Result<Vec<f64>> {
        let url = format!(
            "{}/api/qt/stock/kline/get?secid={}&fields1=f1,f2,f3&fields2=f51,f52,f53&klt=101&fqt=1&end=20500101&lmt={}",
            self.history_url,
            secid(symbol),
            count
        );

        let body = self
            .get_json(&url)
            .await
            .map_err(|e| MonitorError::HistoryUnavailable {
                symbol: symbol.to_string(),
                reason: e.to_string(),
            })?;

        let mut closes = parse_kline_closes(symbol, &body)?;
        if closes.len() < count {
            return Err(MonitorError::HistoryUnavailable {
                symbol: symbol.to_string(),
                reason: format!("requested {} bars, got {}", count, closes.len()),
            });
        }
        if closes.len() > count {
            closes.drain(..closes.len() - count);
        }

        debug!(symbol = %symbol, count = closes.len(), "Fetched {} closes for {}", closes.len(), symbol);
        Ok(closes)
    }
}
