use crate::domain::errors::QuoteError;
use crate::domain::trading::charges::RawQuote;
use crate::domain::trading::record::TradeRecord;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;

/// What the fee calculator is asked for one trade leg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRequest {
    pub lot_size: u64,
    pub total_lot_size: u64,
    pub buy_value: Decimal,
    pub sell_value: Decimal,
}

impl From<&TradeRecord> for QuoteRequest {
    fn from(record: &TradeRecord) -> Self {
        Self {
            lot_size: record.lot_size,
            total_lot_size: record.total_lot_size,
            buy_value: record.buy_value,
            sell_value: record.sell_value,
        }
    }
}

/// External fee calculator. Every call opens its own session and releases it
/// before returning, whatever the result.
#[async_trait]
pub trait QuoteService: Send + Sync {
    async fn fetch_quote(&self, request: &QuoteRequest) -> Result<RawQuote, QuoteError>;

    /// Short name used in logs and metrics labels.
    fn name(&self) -> &'static str;
}

/// Progress notifications emitted by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ProgressEvent {
    Advanced {
        completed: usize,
        total: usize,
        percent: f64,
    },
    Finished {
        total: usize,
        succeeded: usize,
        failed: usize,
    },
}

/// Receives progress events. Only ever called from the coordinating task.
pub trait ProgressSink: Send + Sync {
    fn publish(&self, event: ProgressEvent);
}
