//! Gridwatch Monitor
//!
//! Polls fund quotes on a fixed interval, pushes add/trim signals and keeps
//! the per-fund state file up to date.

use dotenvy::dotenv;
use gridwatch::config::{self, AppConfig};
use gridwatch::core::http::{start_server, AppState};
use gridwatch::core::runtime::MonitorRuntime;
use gridwatch::core::scheduler::TickScheduler;
use gridwatch::db::{JsonStateStore, StateStore};
use gridwatch::logging;
use gridwatch::metrics::Metrics;
use gridwatch::services::eastmoney::EastmoneyProvider;
use gridwatch::services::market_data::MarketDataProvider;
use gridwatch::services::notify::{LogNotifier, Notifier, PushPlusNotifier};
use gridwatch::signals::engine::SignalEngine;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let env = config::get_environment();
    info!("Starting Gridwatch Monitor");
    info!(environment = %env, "Environment");

    let config_path = config::get_config_path();
    let app_config = AppConfig::load().map_err(|e| {
        error!(path = %config_path.display(), error = %e, "Configuration rejected");
        e
    })?;

    info!(
        funds = app_config.funds.len(),
        interval = app_config.poll_interval_seconds,
        "Monitoring {} funds every {} seconds",
        app_config.funds.len(),
        app_config.poll_interval_seconds
    );
    for fund in &app_config.funds {
        info!(
            fund = %fund.name,
            symbol = %fund.symbol,
            strategy = ?fund.strategy,
            "Fund {} ({})",
            fund.name,
            fund.symbol
        );
    }

    let metrics = Arc::new(Metrics::new()?);

    let provider: Arc<dyn MarketDataProvider> = Arc::new(
        EastmoneyProvider::with_client(
            app_config.quote_url.clone(),
            app_config.history_url.clone(),
            reqwest::Client::new(),
        )
        .with_price_scales(
            app_config
                .funds
                .iter()
                .map(|f| (f.symbol.clone(), f.price_scale)),
        ),
    );

    let notifier: Arc<dyn Notifier> = match app_config.pushplus_token.clone() {
        Some(token) => Arc::new(PushPlusNotifier::with_client(
            app_config.pushplus_url.clone(),
            token,
            reqwest::Client::new(),
        )),
        None => {
            warn!("PUSHPLUS_TOKEN not set, signals will only be logged");
            Arc::new(LogNotifier)
        }
    };

    info!(path = %app_config.state_file.display(), "State file");
    let store: Arc<dyn StateStore> = Arc::new(JsonStateStore::new(app_config.state_file.clone()));

    let engine = SignalEngine::new(app_config.funds.clone()).with_metrics(metrics.clone());
    let runtime = MonitorRuntime::new(engine, provider, notifier, store)
        .await
        .with_metrics(metrics.clone())
        .with_config_reload(config_path);

    let scheduler = TickScheduler::new(app_config.poll_interval_seconds)?;

    if app_config.status_port > 0 {
        let port = app_config.status_port;
        let state = AppState::new(metrics.clone());
        tokio::spawn(async move {
            if let Err(e) = start_server(port, state).await {
                error!(error = %e, "Status server error");
            }
        });
    }

    info!("Monitor started, press Ctrl+C to stop");
    runtime
        .run(scheduler, async {
            if let Err(e) = signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await;

    info!("Monitor stopped");
    Ok(())
}
