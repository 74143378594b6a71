use super::session::SessionTracker;
use crate::domain::errors::QuoteError;
use crate::domain::ports::{QuoteRequest, QuoteService};
use crate::domain::trading::charges::RawQuote;
use crate::domain::trading::currency::format_currency;
use crate::domain::trading::fee_schedule::FeeSchedule;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;

/// Offline fee calculator backed by a published rate card.
///
/// Renders its figures as display strings so runs take the same decoding path
/// as the live calculator.
pub struct ScheduleQuoteService {
    schedule: FeeSchedule,
    sessions: SessionTracker,
}

impl ScheduleQuoteService {
    pub fn new(schedule: FeeSchedule) -> Self {
        Self {
            schedule,
            sessions: SessionTracker::new(),
        }
    }

    /// Loads rate overrides from a TOML file; unspecified rates keep defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fee schedule {}", path.display()))?;
        let schedule: FeeSchedule = toml::from_str(&content)
            .with_context(|| format!("Failed to parse fee schedule {}", path.display()))?;
        Ok(Self::new(schedule))
    }

    pub fn with_sessions(mut self, sessions: SessionTracker) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn schedule(&self) -> &FeeSchedule {
        &self.schedule
    }
}

impl Default for ScheduleQuoteService {
    fn default() -> Self {
        Self::new(FeeSchedule::default())
    }
}

#[async_trait]
impl QuoteService for ScheduleQuoteService {
    async fn fetch_quote(&self, request: &QuoteRequest) -> Result<RawQuote, QuoteError> {
        let _session = self.sessions.open(self.name());
        let charges = self
            .schedule
            .calculate(request.buy_value, request.sell_value, request.total_lot_size)
            .ok_or(QuoteError::Overflow {
                figure: "scheduled charges",
            })?;

        Ok(RawQuote {
            brokerage: Some(format_currency(charges.brokerage)),
            stt: Some(format_currency(charges.stt)),
            exchange_txn_charge: Some(format_currency(charges.exchange_txn_charge)),
            gst: Some(format_currency(charges.gst)),
            sebi_charges: Some(format_currency(charges.sebi_charges)),
            stamp_duty: Some(format_currency(charges.stamp_duty)),
            total_charges: Some(format_currency(charges.total)),
            breakeven_points: Some(format_currency(charges.breakeven_points)),
        })
    }

    fn name(&self) -> &'static str {
        "schedule"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trading::charges::ChargeBreakdown;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[tokio::test]
    async fn test_schedule_quote_decodes_consistently() {
        let service = ScheduleQuoteService::default();
        let request = QuoteRequest {
            lot_size: 50,
            total_lot_size: 100,
            buy_value: dec!(100),
            sell_value: dec!(105),
        };

        let raw = service.fetch_quote(&request).await.unwrap();
        assert_eq!(raw.brokerage.as_deref(), Some("₹6.15"));
        assert_eq!(raw.total_charges.as_deref(), Some("₹11.07"));

        let breakdown = ChargeBreakdown::assemble(&raw, dec!(20500)).unwrap();
        assert_eq!(breakdown.components_total(), Some(breakdown.total_charges.amount));
        // 100 * 11.07 / 20500 = 0.054
        assert_eq!(breakdown.brokerage_percentage, dec!(0.054));
    }

    #[tokio::test]
    async fn test_overflowing_request_is_a_quote_error() {
        let service = ScheduleQuoteService::default();
        let request = QuoteRequest {
            lot_size: 1,
            total_lot_size: 2,
            buy_value: Decimal::MAX,
            sell_value: dec!(0),
        };

        let err = service.fetch_quote(&request).await.unwrap_err();
        assert!(matches!(err, QuoteError::Overflow { .. }));
        assert_eq!(service.sessions.open_sessions(), 0);
    }

    #[test]
    fn test_loads_overrides_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "brokerage_cap = \"10\"").unwrap();

        let service = ScheduleQuoteService::from_toml_file(file.path()).unwrap();
        assert_eq!(service.schedule().brokerage_cap, dec!(10));
        assert_eq!(service.schedule().stt_sell_rate, dec!(0.00025));
    }

    #[test]
    fn test_missing_schedule_file_is_an_error() {
        let result = ScheduleQuoteService::from_toml_file(Path::new("/nonexistent/fees.toml"));
        assert!(result.is_err());
    }
}
