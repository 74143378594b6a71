use crate::config::{Config, QuoteMode};
use crate::domain::ports::QuoteService;
use crate::infrastructure::mock::MockQuoteService;
use crate::infrastructure::quote::{HttpQuoteService, ScheduleQuoteService, SessionTracker};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

pub struct ServiceFactory;

impl ServiceFactory {
    /// Build the fee calculator selected by `config.quote_mode`.
    ///
    /// Every adapter reports its sessions to `sessions`, so the caller can read
    /// the concurrency high-water mark after a run.
    pub fn create_quote_service(
        config: &Config,
        sessions: SessionTracker,
    ) -> Result<Arc<dyn QuoteService>> {
        match config.quote_mode {
            QuoteMode::Schedule => {
                let service = match &config.fee_schedule_path {
                    Some(path) => ScheduleQuoteService::from_toml_file(path)?,
                    None => ScheduleQuoteService::default(),
                };
                info!("ServiceFactory: using offline fee schedule");
                Ok(Arc::new(service.with_sessions(sessions)))
            }
            QuoteMode::Http => {
                let endpoint = config
                    .quote_service_url
                    .clone()
                    .context("QUOTE_MODE=http requires QUOTE_SERVICE_URL")?;
                info!("ServiceFactory: using fee calculator at {}", endpoint);
                Ok(Arc::new(
                    HttpQuoteService::new(
                        endpoint,
                        config.quote_ready_timeout(),
                        config.quote_request_timeout(),
                    )
                    .with_sessions(sessions),
                ))
            }
            QuoteMode::Mock => {
                info!("ServiceFactory: using mock fee calculator");
                Ok(Arc::new(MockQuoteService::new().with_sessions(sessions)))
            }
        }
    }
}
