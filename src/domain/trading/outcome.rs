use crate::domain::errors::RecordError;
use crate::domain::trading::charges::{ChargeBreakdown, ChargeField};
use crate::domain::trading::currency::is_plain_decimal;
use crate::domain::trading::record::{CellValue, TradeRecord};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Summary report columns, in output order.
pub const SUMMARY_COLUMNS: [&str; 17] = [
    "SL_N0",
    "SYMBOLS",
    "LOT_SIZE",
    "PREMUIM_VALUE",
    "NO_OF_LOTS",
    "TOTAL_LOT_SIZE",
    "TOTAL_PREMIUM_VALUE",
    "BROKERAGE",
    "STT_TOTAL",
    "EXCHANGE_TXN_Charge",
    "GST",
    "SEBI_CHARGES",
    "STAMP DUTY",
    "TOTAL TAX AND CHARGES",
    "POINTS TO BREAKEVEN",
    "TOTAL BROKERAGE",
    "BROKERAGE %",
];

/// Result of processing one record.
#[derive(Debug, Clone)]
pub enum Outcome {
    Success {
        /// Zero-based position of the row in the input sheet.
        row: usize,
        record: TradeRecord,
        breakdown: ChargeBreakdown,
    },
    Failure {
        /// Zero-based position of the row in the input sheet.
        row: usize,
        sl_no: Option<i64>,
        error: String,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn sl_no(&self) -> Option<i64> {
        match self {
            Outcome::Success { record, .. } => Some(record.sl_no),
            Outcome::Failure { sl_no, .. } => *sl_no,
        }
    }
}

/// One summary report row, cells aligned with [`SUMMARY_COLUMNS`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    pub sl_no: i64,
    pub cells: Vec<CellValue>,
}

impl OutputRow {
    /// Fails only when a premium figure of `record` overflows.
    pub fn merge(record: &TradeRecord, breakdown: &ChargeBreakdown) -> Result<Self, RecordError> {
        let premium_value = record.premium_value().ok_or(RecordError::Overflow {
            figure: "PREMUIM_VALUE",
        })?;
        let total_premium_value = record.total_premium_value().ok_or(RecordError::Overflow {
            figure: "TOTAL_PREMIUM_VALUE",
        })?;
        let cells = vec![
            CellValue::Integer(record.sl_no),
            CellValue::Text(record.symbol.clone()),
            unsigned(record.lot_size),
            CellValue::Number(premium_value),
            unsigned(record.no_of_lots),
            unsigned(record.total_lot_size),
            CellValue::Number(total_premium_value),
            charge_cell(&breakdown.brokerage),
            charge_cell(&breakdown.stt),
            charge_cell(&breakdown.exchange_txn_charge),
            charge_cell(&breakdown.gst),
            charge_cell(&breakdown.sebi_charges),
            charge_cell(&breakdown.stamp_duty),
            charge_cell(&breakdown.total_charges),
            charge_cell(&breakdown.breakeven_points),
            charge_cell(&breakdown.total_charges),
            display_cell(&breakdown.percentage_display()),
        ];
        Ok(Self {
            sl_no: record.sl_no,
            cells,
        })
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        SUMMARY_COLUMNS
            .iter()
            .position(|c| *c == column)
            .and_then(|i| self.cells.get(i))
    }
}

fn unsigned(value: u64) -> CellValue {
    i64::try_from(value)
        .map(CellValue::Integer)
        .unwrap_or_else(|_| CellValue::Number(Decimal::from(value)))
}

fn charge_cell(field: &ChargeField) -> CellValue {
    display_cell(&field.display)
}

/// Bare decimal strings become numbers; display strings stay text.
fn display_cell(value: &str) -> CellValue {
    if is_plain_decimal(value) {
        if let Ok(d) = Decimal::from_str(value) {
            return CellValue::Number(d);
        }
    }
    CellValue::Text(value.to_string())
}
