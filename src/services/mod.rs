//! External collaborators: market data and notifications.

pub mod eastmoney;
pub mod market_data;
pub mod notify;

pub use market_data::{MarketDataProvider, StaticMarketDataProvider};
