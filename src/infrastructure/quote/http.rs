//! Fee calculator reached over HTTP.
//!
//! Each quote builds its own client (connection pool and cookies included),
//! waits for the calculator to answer a readiness probe, posts the trade leg
//! and reads back the charge fields keyed by the calculator's element ids.

use super::session::SessionTracker;
use crate::domain::errors::QuoteError;
use crate::domain::ports::{QuoteRequest, QuoteService};
use crate::domain::trading::charges::RawQuote;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Body posted to the calculator.
#[derive(Debug, Serialize)]
struct CalculatorForm {
    buy_price: String,
    sell_price: String,
    quantity: u64,
    lot_size: u64,
}

impl From<&QuoteRequest> for CalculatorForm {
    fn from(request: &QuoteRequest) -> Self {
        Self {
            buy_price: request.buy_value.to_string(),
            sell_price: request.sell_value.to_string(),
            quantity: request.total_lot_size,
            lot_size: request.lot_size,
        }
    }
}

pub struct HttpQuoteService {
    endpoint: Url,
    ready_timeout: Duration,
    request_timeout: Duration,
    sessions: SessionTracker,
}

impl HttpQuoteService {
    pub fn new(endpoint: Url, ready_timeout: Duration, request_timeout: Duration) -> Self {
        Self {
            endpoint,
            ready_timeout,
            request_timeout,
            sessions: SessionTracker::new(),
        }
    }

    pub fn with_sessions(mut self, sessions: SessionTracker) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn sessions(&self) -> &SessionTracker {
        &self.sessions
    }

    fn build_client(&self) -> Result<Client, QuoteError> {
        Client::builder()
            .pool_max_idle_per_host(1)
            .connect_timeout(self.ready_timeout)
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| QuoteError::ServiceUnavailable {
                reason: format!("could not build HTTP client: {}", e),
            })
    }

    async fn wait_until_ready(&self, client: &Client) -> Result<(), QuoteError> {
        let probe = client.get(self.endpoint.clone()).send();
        match tokio::time::timeout(self.ready_timeout, probe).await {
            Err(_) => Err(QuoteError::SessionTimeout {
                timeout_ms: self.ready_timeout.as_millis() as u64,
            }),
            Ok(Err(e)) if e.is_timeout() => Err(QuoteError::SessionTimeout {
                timeout_ms: self.ready_timeout.as_millis() as u64,
            }),
            Ok(Err(e)) => Err(QuoteError::ServiceUnavailable {
                reason: e.to_string(),
            }),
            Ok(Ok(resp)) if !resp.status().is_success() => Err(QuoteError::ServiceUnavailable {
                reason: format!("readiness probe returned {}", resp.status()),
            }),
            Ok(Ok(_)) => Ok(()),
        }
    }
}

#[async_trait]
impl QuoteService for HttpQuoteService {
    async fn fetch_quote(&self, request: &QuoteRequest) -> Result<RawQuote, QuoteError> {
        let session = self.sessions.open(self.name());
        let client = self.build_client()?;

        self.wait_until_ready(&client).await?;

        let response = client
            .post(self.endpoint.clone())
            .json(&CalculatorForm::from(request))
            .send()
            .await
            .map_err(|e| QuoteError::ServiceUnavailable {
                reason: e.to_string(),
            })?
            .error_for_status()
            .map_err(|e| QuoteError::ServiceUnavailable {
                reason: e.to_string(),
            })?;

        let raw = response
            .json::<RawQuote>()
            .await
            .map_err(|e| QuoteError::ServiceUnavailable {
                reason: format!("unexpected response shape: {}", e),
            })?;

        debug!("Session {}: quote received", session.id());
        Ok(raw)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
