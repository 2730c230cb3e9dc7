//! Application configuration: JSON file plus environment overrides.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{MonitorError, Result};
use crate::models::{FundConfig, StrategyKind};
use crate::services::eastmoney::provider::{DEFAULT_HISTORY_URL, DEFAULT_QUOTE_URL};
use crate::services::notify::pushplus::DEFAULT_PUSHPLUS_URL;
use crate::signals::sizing::PositionSizer;

pub const DEFAULT_CONFIG_PATH: &str = "gridwatch.json";
pub const DEFAULT_STATE_PATH: &str = "etf_monitor_state.json";
pub const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 600;

/// Deployment environment (`APP_ENV`), defaults to `sandbox`
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn get_config_path() -> PathBuf {
    env::var("GRIDWATCH_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

pub fn get_state_path() -> Option<PathBuf> {
    env::var("STATE_FILE").ok().map(PathBuf::from)
}

pub fn get_poll_interval_seconds() -> Option<u64> {
    env::var("POLL_INTERVAL_SECONDS")
        .ok()
        .and_then(|i| i.parse().ok())
}

pub fn get_pushplus_token() -> Option<String> {
    env::var("PUSHPLUS_TOKEN").ok().filter(|t| !t.trim().is_empty())
}

pub fn get_status_port() -> Option<u16> {
    env::var("STATUS_PORT").ok().and_then(|p| p.parse().ok())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pushplus_token: Option<String>,
    #[serde(default = "default_pushplus_url")]
    pub pushplus_url: String,
    #[serde(default = "default_quote_url")]
    pub quote_url: String,
    #[serde(default = "default_history_url")]
    pub history_url: String,
    /// Port for `/health` and `/metrics`; 0 disables the status server
    #[serde(default)]
    pub status_port: u16,
    /// Processed in this order every tick
    pub funds: Vec<FundConfig>,
}

impl AppConfig {
    /// Load the file named by `GRIDWATCH_CONFIG`, apply env overrides, validate
    pub fn load() -> Result<Self> {
        let mut config = Self::from_file(&get_config_path())?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            MonitorError::ConfigInvalid(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&raw)
    }

    /// Parse without validating
    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| MonitorError::ConfigInvalid(e.to_string()))
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(path) = get_state_path() {
            self.state_file = path;
        }
        if let Some(interval) = get_poll_interval_seconds() {
            self.poll_interval_seconds = interval;
        }
        if let Some(token) = get_pushplus_token() {
            self.pushplus_token = Some(token);
        }
        if let Some(port) = get_status_port() {
            self.status_port = port;
        }
    }

    /// Reject anything the engine cannot compute with. Fatal at startup.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_seconds == 0 {
            return Err(invalid("poll_interval_seconds must be > 0"));
        }
        if self.funds.is_empty() {
            return Err(invalid("no funds configured"));
        }

        let mut names = HashSet::new();
        for fund in &self.funds {
            if fund.name.trim().is_empty() {
                return Err(invalid("fund name must not be empty"));
            }
            if !names.insert(fund.name.as_str()) {
                return Err(invalid(format!("duplicate fund name '{}'", fund.name)));
            }
            validate_fund(fund)?;
        }

        Ok(())
    }
}

fn validate_fund(fund: &FundConfig) -> Result<()> {
    let name = &fund.name;

    if fund.symbol.trim().is_empty() {
        return Err(invalid(format!("{}: symbol must not be empty", name)));
    }
    require_positive(name, "base_price", fund.base_price)?;
    require_positive(name, "price_scale", fund.price_scale)?;

    for (field, spacing) in [
        ("grid_pct", fund.grid_pct),
        ("grid_low", fund.grid_low),
        ("grid_mid", fund.grid_mid),
        ("grid_high", fund.grid_high),
        ("grid_expensive", fund.grid_expensive),
    ] {
        require_positive(name, field, spacing)?;
    }
    require_non_negative(name, "step_pct", fund.step_pct)?;

    if fund.strategy == StrategyKind::YieldGrid && PositionSizer::grid_units(fund) == 0 {
        return Err(invalid(format!(
            "{}: base_units x step_pct rounds to 0 units per grid line ({} x {})",
            name, fund.base_units, fund.step_pct
        )));
    }

    if fund.strategy == StrategyKind::MaZone {
        if fund.ma_short == 0 || fund.ma_long == 0 {
            return Err(invalid(format!(
                "{}: moving-average windows must be > 0",
                name
            )));
        }
        let zone = &fund.zone;
        require_positive(name, "zone.interval_pct", zone.interval_pct)?;
        require_positive(name, "zone.sell_trigger_up_pct", zone.sell_trigger_up_pct)?;
        require_positive(name, "zone.box_grid_pct", zone.box_grid_pct)?;
        require_non_negative(name, "zone.add_pct", zone.add_pct)?;
        require_non_negative(name, "zone.sell_pct", zone.sell_pct)?;
        require_non_negative(name, "zone.stop_add_above_pct", zone.stop_add_above_pct)?;
        require_non_negative(name, "zone.box_grid_units_pct", zone.box_grid_units_pct)?;

        if PositionSizer::box_units(fund) == 0
            && PositionSizer::accumulation_units(fund, 1) == 0
            && PositionSizer::trend_units(fund, 1) == 0
        {
            return Err(invalid(format!(
                "{}: target_units {} sizes every zone signal to 0 units",
                name, fund.target_units
            )));
        }
    }

    Ok(())
}

fn require_positive(fund: &str, field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{}: {} must be > 0, got {}", fund, field, value)))
    }
}

fn require_non_negative(fund: &str, field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{}: {} must be >= 0, got {}", fund, field, value)))
    }
}

fn invalid(reason: impl Into<String>) -> MonitorError {
    MonitorError::ConfigInvalid(reason.into())
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECONDS
}

fn default_state_file() -> PathBuf {
    PathBuf::from(DEFAULT_STATE_PATH)
}

fn default_pushplus_url() -> String {
    DEFAULT_PUSHPLUS_URL.to_string()
}

fn default_quote_url() -> String {
    DEFAULT_QUOTE_URL.to_string()
}

fn default_history_url() -> String {
    DEFAULT_HISTORY_URL.to_string()
}
