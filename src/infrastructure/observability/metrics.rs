//! Prometheus metrics definitions for brokerage_report
//!
//! All metrics use the `brokerage_report_` prefix and are read-only.

use prometheus::{
    CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;

/// Prometheus metrics for a report run
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Quote attempts by service and status
    pub quotes_total: CounterVec,
    /// Quote latency in seconds, decode included
    pub quote_latency_seconds: HistogramVec,
    /// Highest number of concurrently open calculator sessions
    pub peak_sessions: GenericGauge<AtomicF64>,
    /// Summary rows by outcome
    pub report_rows_total: CounterVec,
    /// Wall time of the last run
    pub run_duration_seconds: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let quotes_total = CounterVec::new(
            Opts::new(
                "brokerage_report_quotes_total",
                "Total quote attempts by service and status",
            ),
            &["service", "status"],
        )?;
        registry.register(Box::new(quotes_total.clone()))?;

        let quote_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "brokerage_report_quote_latency_seconds",
                "Quote round trip in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
            ]),
            &["service"],
        )?;
        registry.register(Box::new(quote_latency_seconds.clone()))?;

        let peak_sessions = Gauge::with_opts(Opts::new(
            "brokerage_report_peak_sessions",
            "Highest number of concurrently open calculator sessions",
        ))?;
        registry.register(Box::new(peak_sessions.clone()))?;

        let report_rows_total = CounterVec::new(
            Opts::new(
                "brokerage_report_rows_total",
                "Input rows by outcome (succeeded, failed)",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(report_rows_total.clone()))?;

        let run_duration_seconds = Gauge::with_opts(Opts::new(
            "brokerage_report_run_duration_seconds",
            "Wall time of the last report run",
        ))?;
        registry.register(Box::new(run_duration_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            quotes_total,
            quote_latency_seconds,
            peak_sessions,
            report_rows_total,
            run_duration_seconds,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn inc_quotes(&self, service: &str, status: &str) {
        self.quotes_total.with_label_values(&[service, status]).inc();
    }

    pub fn observe_quote_latency(&self, service: &str, latency: f64) {
        self.quote_latency_seconds
            .with_label_values(&[service])
            .observe(latency);
    }

    pub fn record_rows(&self, succeeded: usize, failed: usize) {
        self.report_rows_total
            .with_label_values(&["succeeded"])
            .inc_by(succeeded as f64);
        self.report_rows_total
            .with_label_values(&["failed"])
            .inc_by(failed as f64);
    }

    /// Count of quotes recorded for `service` with `status`.
    pub fn quotes(&self, service: &str, status: &str) -> u64 {
        self.quotes_total.with_label_values(&[service, status]).get() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.peak_sessions.set(0.0);
        assert!(metrics.render().contains("brokerage_report_"));
    }

    #[test]
    fn test_quote_counter_by_status() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.inc_quotes("mock", "ok");
        metrics.inc_quotes("mock", "ok");
        metrics.inc_quotes("mock", "error");

        assert_eq!(metrics.quotes("mock", "ok"), 2);
        assert_eq!(metrics.quotes("mock", "error"), 1);
        assert!(metrics.render().contains("brokerage_report_quotes_total"));
    }

    #[test]
    fn test_row_counters() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.record_rows(3, 1);
        let output = metrics.render();
        assert!(output.contains("brokerage_report_rows_total{outcome=\"succeeded\"} 3"));
        assert!(output.contains("brokerage_report_rows_total{outcome=\"failed\"} 1"));
    }
}
