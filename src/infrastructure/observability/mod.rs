//! Push-based observability for brokerage_report
//!
//! Metrics leave the process as **outbound data only**: a Prometheus registry
//! kept in memory and one `METRICS_JSON:` line on stdout at the end of a run.

pub mod metrics;
pub mod reporter;

pub use metrics::Metrics;
pub use reporter::RunReporter;
