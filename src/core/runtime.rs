//! Monitor runtime: one tick = evaluate all funds, notify, persist state

use std::collections::HashSet;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Instant, SystemTime};
use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::core::scheduler::TickScheduler;
use crate::db::StateStore;
use crate::metrics::Metrics;
use crate::models::{Signal, StateMap};
use crate::services::market_data::MarketDataProvider;
use crate::services::notify::{format_batch, Notifier};
use crate::signals::engine::SignalEngine;

pub struct MonitorRuntime {
    engine: SignalEngine,
    provider: Arc<dyn MarketDataProvider>,
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn StateStore>,
    state: StateMap,
    metrics: Option<Arc<Metrics>>,
    config_path: Option<PathBuf>,
    config_modified: Option<SystemTime>,
}

impl MonitorRuntime {
    /// Build the runtime and restore the last snapshot.
    ///
    /// An unreadable snapshot is logged and replaced by an empty state.
    pub async fn new(
        engine: SignalEngine,
        provider: Arc<dyn MarketDataProvider>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn StateStore>,
    ) -> Self {
        let state = match store.load().await {
            Ok(state) => {
                info!(funds = state.len(), "Restored state for {} funds", state.len());
                state
            }
            Err(e) => {
                warn!(error = %e, "Failed to load state, starting fresh");
                StateMap::new()
            }
        };

        Self {
            engine,
            provider,
            notifier,
            store,
            state,
            metrics: None,
            config_path: None,
            config_modified: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        metrics.funds_configured.set(self.engine.funds().len() as f64);
        self.metrics = Some(metrics);
        self
    }

    /// Re-read fund definitions from `path` whenever its mtime changes
    pub fn with_config_reload(mut self, path: PathBuf) -> Self {
        self.config_modified = modified_time(&path);
        self.config_path = Some(path);
        self
    }

    pub fn state(&self) -> &StateMap {
        &self.state
    }

    pub fn engine(&self) -> &SignalEngine {
        &self.engine
    }

    /// Run one polling tick and return the signals it produced
    pub async fn tick(&mut self) -> Vec<Signal> {
        let start = Instant::now();
        self.reload_config_if_changed();

        let state = std::mem::take(&mut self.state);
        let (state, signals) = self.engine.run_tick(state, self.provider.as_ref()).await;
        self.state = state;
        self.prune_removed_funds();

        if let Some(message) = format_batch(&signals) {
            if let Err(e) = self.notifier.send(&message).await {
                error!(
                    error = %e,
                    signals = signals.len(),
                    "Failed to deliver {} signals",
                    signals.len()
                );
                if let Some(ref metrics) = self.metrics {
                    metrics.notify_failures_total.inc();
                }
            }
        }

        // A failed save is retried implicitly by the next tick's save
        if let Err(e) = self.store.save(&self.state).await {
            error!(error = %e, "Failed to save state");
            if let Some(ref metrics) = self.metrics {
                metrics.state_save_failures_total.inc();
            }
        }

        if let Some(ref metrics) = self.metrics {
            metrics.ticks_total.inc();
            metrics.signals_emitted_total.inc_by(signals.len() as u64);
            metrics
                .tick_duration_seconds
                .observe(start.elapsed().as_secs_f64());
        }

        debug!(
            signals = signals.len(),
            duration_ms = start.elapsed().as_millis(),
            "Tick complete"
        );
        signals
    }

    /// Tick immediately, then on every scheduler slot until `shutdown` resolves.
    ///
    /// Shutdown is only observed between ticks, so a tick always completes
    /// and persists its state.
    pub async fn run<F>(mut self, mut scheduler: TickScheduler, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            self.tick().await;

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Monitor loop stopping");
                    break;
                }
                _ = scheduler.wait_next() => {}
            }
        }
    }

    /// Drop snapshot entries for funds no longer in the configuration
    fn prune_removed_funds(&mut self) {
        let configured: HashSet<&str> = self
            .engine
            .funds()
            .iter()
            .map(|f| f.name.as_str())
            .collect();

        self.state.retain(|name, _| {
            let keep = configured.contains(name.as_str());
            if !keep {
                info!(fund = %name, "Dropping state for {} (no longer configured)", name);
            }
            keep
        });
    }

    fn reload_config_if_changed(&mut self) {
        let Some(ref path) = self.config_path else {
            return;
        };

        let modified = modified_time(path);
        if modified.is_none() || modified == self.config_modified {
            return;
        }
        self.config_modified = modified;

        let reloaded = AppConfig::from_file(path).and_then(|config| {
            config.validate()?;
            Ok(config)
        });

        match reloaded {
            Ok(config) => {
                info!(
                    path = %path.display(),
                    funds = config.funds.len(),
                    "Configuration reloaded"
                );
                if let Some(ref metrics) = self.metrics {
                    metrics.funds_configured.set(config.funds.len() as f64);
                }
                self.engine.replace_funds(config.funds);
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Ignoring invalid configuration change, keeping previous funds"
                );
            }
        }
    }
}

fn modified_time(path: &std::path::Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
