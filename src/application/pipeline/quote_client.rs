use crate::domain::errors::QuoteError;
use crate::domain::ports::{QuoteRequest, QuoteService};
use crate::domain::trading::charges::ChargeBreakdown;
use crate::infrastructure::observability::Metrics;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Quotes one trade leg and turns the service's display strings into a
/// [`ChargeBreakdown`].
#[derive(Clone)]
pub struct QuoteClient {
    service: Arc<dyn QuoteService>,
    metrics: Option<Metrics>,
}

impl QuoteClient {
    pub fn new(service: Arc<dyn QuoteService>) -> Self {
        Self {
            service,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn service_name(&self) -> &'static str {
        self.service.name()
    }

    /// Quote one trade leg.
    ///
    /// Rejects a zero quantity, negative prices or a turnover that does not
    /// fit a `Decimal` before touching the service.
    pub async fn quote(&self, request: &QuoteRequest) -> Result<ChargeBreakdown, QuoteError> {
        if request.total_lot_size == 0 {
            return Err(QuoteError::InvalidRequest {
                reason: "total lot size must be positive".to_string(),
            });
        }
        for (label, value) in [("buy", request.buy_value), ("sell", request.sell_value)] {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(QuoteError::InvalidRequest {
                    reason: format!("{} value {} is negative", label, value),
                });
            }
        }

        let turnover = request
            .buy_value
            .checked_add(request.sell_value)
            .and_then(|premium| premium.checked_mul(Decimal::from(request.total_lot_size)))
            .ok_or_else(|| QuoteError::InvalidRequest {
                reason: format!(
                    "turnover of ({} + {}) x {} overflows",
                    request.buy_value, request.sell_value, request.total_lot_size
                ),
            })?;
        if turnover <= Decimal::ZERO {
            return Err(QuoteError::ZeroTurnover { turnover });
        }

        let started = Instant::now();
        let result = self
            .service
            .fetch_quote(request)
            .await
            .and_then(|raw| ChargeBreakdown::assemble(&raw, turnover));
        let elapsed = started.elapsed();

        if let Some(metrics) = &self.metrics {
            let status = if result.is_ok() { "ok" } else { "error" };
            metrics.inc_quotes(self.service.name(), status);
            metrics.observe_quote_latency(self.service.name(), elapsed.as_secs_f64());
        }
        debug!(
            "QuoteClient [{}]: qty={} buy={} sell={} in {:?}",
            self.service.name(),
            request.total_lot_size,
            request.buy_value,
            request.sell_value,
            elapsed
        );

        result
    }
}
