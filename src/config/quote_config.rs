//! Quote service configuration parsing from environment variables.
//!
//! Selects which fee calculator backs the run:
//! - `schedule` (offline rate card, default)
//! - `http` (live calculator endpoint)
//! - `mock` (fixed charges, for dry runs)

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

/// Which Quote Service implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteMode {
    Schedule,
    Http,
    Mock,
}

impl FromStr for QuoteMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "schedule" => Ok(QuoteMode::Schedule),
            "http" => Ok(QuoteMode::Http),
            "mock" => Ok(QuoteMode::Mock),
            _ => anyhow::bail!(
                "Invalid QUOTE_MODE: {}. Must be 'schedule', 'http', or 'mock'",
                s
            ),
        }
    }
}

/// Quote service environment configuration
#[derive(Debug, Clone)]
pub struct QuoteServiceEnvConfig {
    pub mode: QuoteMode,
    pub service_url: Option<Url>,
    pub ready_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub fee_schedule_path: Option<PathBuf>,
}

impl Default for QuoteServiceEnvConfig {
    fn default() -> Self {
        Self {
            mode: QuoteMode::Schedule,
            service_url: None,
            ready_timeout_secs: 10,
            request_timeout_secs: 30,
            fee_schedule_path: None,
        }
    }
}

impl QuoteServiceEnvConfig {
    pub fn from_env() -> Result<Self> {
        let mode = QuoteMode::from_str(
            &env::var("QUOTE_MODE").unwrap_or_else(|_| "schedule".to_string()),
        )?;

        let service_url = match env::var("QUOTE_SERVICE_URL") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                Url::parse(raw.trim())
                    .with_context(|| format!("Invalid QUOTE_SERVICE_URL: {}", raw))?,
            ),
            _ => None,
        };

        Ok(Self {
            mode,
            service_url,
            ready_timeout_secs: env::var("QUOTE_READY_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u64>()
                .context("Failed to parse QUOTE_READY_TIMEOUT_SECS")?,
            request_timeout_secs: env::var("QUOTE_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .context("Failed to parse QUOTE_REQUEST_TIMEOUT_SECS")?,
            fee_schedule_path: env::var("FEE_SCHEDULE_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}
