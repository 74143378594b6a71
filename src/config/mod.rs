//! Configuration module for brokerage_report.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Quote service, Pipeline, and Observability.

mod observability_config;
mod pipeline_config;
mod quote_config;

pub use observability_config::ObservabilityEnvConfig;
pub use pipeline_config::PipelineEnvConfig;
pub use quote_config::{QuoteMode, QuoteServiceEnvConfig};

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Main application configuration.
///
/// Aggregates the sub-configs into flat fields. CLI flags are applied on top
/// by the binary.
#[derive(Debug, Clone)]
pub struct Config {
    // Quote service (from QuoteServiceEnvConfig)
    pub quote_mode: QuoteMode,
    pub quote_service_url: Option<Url>,
    pub quote_ready_timeout_secs: u64,
    pub quote_request_timeout_secs: u64,
    pub fee_schedule_path: Option<PathBuf>,

    // Pipeline (from PipelineEnvConfig)
    pub workers: usize,
    pub base_dir: PathBuf,
    pub archive_dir_name: String,
    pub output_dir_name: String,

    // Observability (from ObservabilityEnvConfig)
    pub observability_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::compose(
            QuoteServiceEnvConfig::default(),
            PipelineEnvConfig::default(),
            ObservabilityEnvConfig::default(),
        )
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let quote = QuoteServiceEnvConfig::from_env().context("Failed to load quote service config")?;
        let pipeline = PipelineEnvConfig::from_env().context("Failed to load pipeline config")?;
        let observability = ObservabilityEnvConfig::from_env();

        let config = Self::compose(quote, pipeline, observability);
        config.validate()?;
        Ok(config)
    }

    fn compose(
        quote: QuoteServiceEnvConfig,
        pipeline: PipelineEnvConfig,
        observability: ObservabilityEnvConfig,
    ) -> Self {
        Self {
            quote_mode: quote.mode,
            quote_service_url: quote.service_url,
            quote_ready_timeout_secs: quote.ready_timeout_secs,
            quote_request_timeout_secs: quote.request_timeout_secs,
            fee_schedule_path: quote.fee_schedule_path,

            workers: pipeline.workers,
            base_dir: pipeline.base_dir,
            archive_dir_name: pipeline.archive_dir_name,
            output_dir_name: pipeline.output_dir_name,

            observability_enabled: observability.enabled,
        }
    }

    /// Cross-field checks that no single sub-config can make.
    pub fn validate(&self) -> Result<()> {
        if self.quote_mode == QuoteMode::Http && self.quote_service_url.is_none() {
            anyhow::bail!("QUOTE_MODE=http requires QUOTE_SERVICE_URL");
        }
        if self.workers == 0 {
            anyhow::bail!("At least one worker is required");
        }
        Ok(())
    }

    pub fn quote_ready_timeout(&self) -> Duration {
        Duration::from_secs(self.quote_ready_timeout_secs)
    }

    pub fn quote_request_timeout(&self) -> Duration {
        Duration::from_secs(self.quote_request_timeout_secs)
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.base_dir.join(&self.archive_dir_name)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join(&self.output_dir_name)
    }
}
