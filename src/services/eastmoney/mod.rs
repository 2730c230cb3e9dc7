//! Eastmoney push2 quote service

pub mod provider;

pub use provider::{parse_kline_closes, secid, EastmoneyProvider};
