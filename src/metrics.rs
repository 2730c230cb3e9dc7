//! Prometheus metrics for the monitor loop

use prometheus::{Encoder, Gauge, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    pub ticks_total: IntCounter,
    pub signals_emitted_total: IntCounter,
    pub fund_errors_total: IntCounter,
    pub notify_failures_total: IntCounter,
    pub state_save_failures_total: IntCounter,
    pub tick_duration_seconds: Histogram,
    pub funds_configured: Gauge,
    pub http_requests_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let ticks_total = IntCounter::new("ticks_total", "Completed polling ticks")?;
        let signals_emitted_total =
            IntCounter::new("signals_emitted_total", "Signals emitted across all funds")?;
        let fund_errors_total = IntCounter::new(
            "fund_errors_total",
            "Fund evaluations skipped because of quote or history errors",
        )?;
        let notify_failures_total =
            IntCounter::new("notify_failures_total", "Notifications that failed to send")?;
        let state_save_failures_total =
            IntCounter::new("state_save_failures_total", "State snapshots that failed to save")?;
        let tick_duration_seconds = Histogram::with_opts(
            HistogramOpts::new("tick_duration_seconds", "Wall time of one polling tick")
                .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        )?;
        let funds_configured = Gauge::new("funds_configured", "Funds in the active configuration")?;
        let http_requests_total =
            IntCounter::new("http_requests_total", "Requests served by the status server")?;

        registry.register(Box::new(ticks_total.clone()))?;
        registry.register(Box::new(signals_emitted_total.clone()))?;
        registry.register(Box::new(fund_errors_total.clone()))?;
        registry.register(Box::new(notify_failures_total.clone()))?;
        registry.register(Box::new(state_save_failures_total.clone()))?;
        registry.register(Box::new(tick_duration_seconds.clone()))?;
        registry.register(Box::new(funds_configured.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;

        Ok(Self {
            registry,
            ticks_total,
            signals_emitted_total,
            fund_errors_total,
            notify_failures_total,
            state_save_failures_total,
            tick_duration_seconds,
            funds_configured,
            http_requests_total,
        })
    }

    /// Text exposition format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
