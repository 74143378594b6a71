//! End-of-run metrics reporter for brokerage_report
//!
//! Emits one structured JSON line to stdout when a run finishes. Nothing is
//! served or scraped.

use crate::infrastructure::observability::metrics::Metrics;
use crate::infrastructure::quote::SessionTracker;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Metrics snapshot for JSON output
#[derive(Debug, Serialize)]
pub struct RunSnapshot {
    pub timestamp: String,
    pub version: String,
    pub symbol: String,
    pub duration_ms: u128,
    pub rows: RowSnapshot,
    pub sessions: SessionSnapshot,
}

#[derive(Debug, Serialize)]
pub struct RowSnapshot {
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub service: String,
    pub opened: usize,
    pub peak: usize,
}

pub struct RunReporter {
    metrics: Metrics,
    sessions: SessionTracker,
    service: &'static str,
    started: Instant,
}

impl RunReporter {
    pub fn new(metrics: Metrics, sessions: SessionTracker, service: &'static str) -> Self {
        Self {
            metrics,
            sessions,
            service,
            started: Instant::now(),
        }
    }

    /// Update the gauges and build the snapshot for a finished run.
    pub fn snapshot(&self, symbol: &str, succeeded: usize, failed: usize) -> RunSnapshot {
        let elapsed: Duration = self.started.elapsed();
        let peak = self.sessions.peak_sessions();

        self.metrics.record_rows(succeeded, failed);
        self.metrics.peak_sessions.set(peak as f64);
        self.metrics.run_duration_seconds.set(elapsed.as_secs_f64());

        RunSnapshot {
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            symbol: symbol.to_string(),
            duration_ms: elapsed.as_millis(),
            rows: RowSnapshot { succeeded, failed },
            sessions: SessionSnapshot {
                service: self.service.to_string(),
                opened: self.sessions.total_sessions(),
                peak,
            },
        }
    }

    /// Print the snapshot with the `METRICS_JSON:` prefix.
    pub fn report(&self, symbol: &str, succeeded: usize, failed: usize) {
        let snapshot = self.snapshot(symbol, succeeded, failed);
        match serde_json::to_string(&snapshot) {
            Ok(json) => {
                println!("METRICS_JSON:{}", json);
                info!(
                    "RunReporter: {} rows ok, {} failed | peak sessions {} | {} ms",
                    succeeded, failed, snapshot.sessions.peak, snapshot.duration_ms
                );
            }
            Err(e) => warn!("Failed to serialize metrics: {}", e),
        }
    }
}
