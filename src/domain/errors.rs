use crate::domain::trading::currency::CurrencyDecodeError;
use rust_decimal::Decimal;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of one Quote Service round trip. Every variant is fatal to the
/// record being quoted and to nothing else.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Invalid quote request: {reason}")]
    InvalidRequest { reason: String },

    #[error("Quote session not ready after {timeout_ms}ms")]
    SessionTimeout { timeout_ms: u64 },

    #[error("Quote service unavailable: {reason}")]
    ServiceUnavailable { reason: String },

    #[error("Quote response is missing field '{field}'")]
    MissingField { field: &'static str },

    #[error("Could not decode field '{field}': {source}")]
    Decode {
        field: &'static str,
        #[source]
        source: CurrencyDecodeError,
    },

    #[error("Turnover must be positive, got {turnover}")]
    ZeroTurnover { turnover: Decimal },

    #[error("Arithmetic overflow computing {figure}")]
    Overflow { figure: &'static str },
}

/// Why a single input row produced no report row.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Invalid value in column {column}: {reason}")]
    InvalidField { column: &'static str, reason: String },

    #[error("{figure} is too large to compute")]
    Overflow { figure: &'static str },

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error("Worker aborted: {reason}")]
    WorkerPanic { reason: String },
}

/// Problems with the input file. Fatal to the run.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Input file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Could not read {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("Unsupported input format '{extension}' (expected .csv, .xlsx, .xls, .xlsm or .ods)")]
    UnsupportedFormat { extension: String },

    #[error("Input is missing required columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("Input contains no data rows")]
    Empty,

    #[error("Duplicate SL_N0 {sl_no} in input")]
    DuplicateSequence { sl_no: i64 },
}

/// Problems writing run artifacts. Fatal to the run.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Could not create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not copy input to {}: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },
}

/// Run-level failure surfaced to the user as a single message.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_error_formatting() {
        let error = QuoteError::Decode {
            field: "intra_stt",
            source: CurrencyDecodeError::Empty,
        };
        let msg = error.to_string();
        assert!(msg.contains("intra_stt"));
        assert!(msg.contains("empty amount"));

        let error = QuoteError::ZeroTurnover { turnover: dec!(0) };
        assert!(error.to_string().contains("positive"));
    }

    #[test]
    fn test_record_error_is_transparent_over_quote_error() {
        let error: RecordError = QuoteError::SessionTimeout { timeout_ms: 10_000 }.into();
        assert_eq!(error.to_string(), "Quote session not ready after 10000ms");
    }

    #[test]
    fn test_missing_columns_lists_every_column() {
        let error = PipelineError::from(InputError::MissingColumns {
            missing: vec!["BUY_VALUE".to_string(), "SELL_VALUE".to_string()],
        });
        let msg = error.to_string();
        assert!(msg.contains("BUY_VALUE, SELL_VALUE"));
    }
}
