use crate::domain::errors::{InputError, RecordError};
use crate::domain::trading::record::{CellValue, REQUIRED_COLUMNS, TradeRecord};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

/// Symbol used for artifact names when the first row carries none.
pub const UNKNOWN_SYMBOL: &str = "UNKNOWN";

static EMPTY_CELL: CellValue = CellValue::Empty;

/// Raw input sheet: header row plus typed cells, in file order.
#[derive(Debug, Clone, Default)]
pub struct InputTable {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<CellValue>>,
}

impl InputTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let headers: Vec<String> = headers.into_iter().map(|h| h.trim().to_string()).collect();
        let mut index = HashMap::with_capacity(headers.len());
        for (i, h) in headers.iter().enumerate() {
            // First occurrence wins for repeated headers.
            index.entry(h.clone()).or_insert(i);
        }
        Self {
            headers,
            index,
            rows,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, column: &str) -> &CellValue {
        self.index
            .get(column)
            .and_then(|&col| self.rows.get(row).and_then(|r| r.get(col)))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Fails with every missing column named, or when there are no rows.
    pub fn validate(&self) -> Result<(), InputError> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| !self.index.contains_key(**c))
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(InputError::MissingColumns { missing });
        }
        if self.rows.is_empty() {
            return Err(InputError::Empty);
        }
        Ok(())
    }

    /// The report symbol: `SYMBOL` of the first raw row, fixed before dispatch.
    pub fn report_symbol(&self) -> String {
        match self.cell(0, "SYMBOL") {
            cell if cell.is_empty() => UNKNOWN_SYMBOL.to_string(),
            cell => cell.to_string().trim().to_string(),
        }
    }

    /// The required columns of every row, verbatim, in extract order.
    pub fn parameter_rows(&self) -> Vec<Vec<CellValue>> {
        (0..self.rows.len())
            .map(|row| {
                REQUIRED_COLUMNS
                    .iter()
                    .map(|c| self.cell(row, c).clone())
                    .collect()
            })
            .collect()
    }

    /// Parses one row into a [`TradeRecord`].
    pub fn parse_record(&self, row: usize) -> Result<TradeRecord, RecordError> {
        let sl_no = self.integer(row, "SL_N0")?;
        let symbol = match self.cell(row, "SYMBOL") {
            cell if cell.is_empty() => {
                return Err(RecordError::InvalidField {
                    column: "SYMBOL",
                    reason: "blank".to_string(),
                });
            }
            cell => cell.to_string().trim().to_string(),
        };

        let record = TradeRecord {
            sl_no,
            symbol,
            lot_size: self.positive(row, "LOT_SIZE")?,
            no_of_lots: self.positive(row, "NO_OF_LOTS")?,
            total_lot_size: self.positive(row, "TOTAL_LOT_SIZE")?,
            buy_value: self.non_negative(row, "BUY_VALUE")?,
            sell_value: self.non_negative(row, "SELL_VALUE")?,
        };

        // Both premium figures must be computable for the report row.
        if record.total_premium_value().is_none() {
            return Err(RecordError::Overflow {
                figure: "TOTAL_PREMIUM_VALUE",
            });
        }
        if record.turnover().is_none() {
            return Err(RecordError::Overflow { figure: "turnover" });
        }
        Ok(record)
    }

    /// Parses every row, failing the whole table on a repeated `SL_N0`.
    /// Rows that do not parse are returned as errors with their row index.
    pub fn parse_records(&self) -> Result<Vec<(usize, Result<TradeRecord, RecordError>)>, InputError> {
        let mut seen = HashSet::with_capacity(self.rows.len());
        let mut parsed = Vec::with_capacity(self.rows.len());
        for row in 0..self.rows.len() {
            let record = self.parse_record(row);
            if let Ok(r) = &record {
                if !seen.insert(r.sl_no) {
                    return Err(InputError::DuplicateSequence { sl_no: r.sl_no });
                }
            }
            parsed.push((row, record));
        }
        Ok(parsed)
    }

    /// Best-effort `SL_N0` for logging rows that failed to parse.
    pub fn sl_no_hint(&self, row: usize) -> Option<i64> {
        self.integer(row, "SL_N0").ok()
    }

    fn decimal(&self, row: usize, column: &'static str) -> Result<Decimal, RecordError> {
        let invalid = |reason: String| RecordError::InvalidField { column, reason };
        match self.cell(row, column) {
            CellValue::Integer(i) => Ok(Decimal::from(*i)),
            CellValue::Number(d) => Ok(*d),
            CellValue::Text(s) if !s.trim().is_empty() => Decimal::from_str(s.trim())
                .map_err(|_| invalid(format!("'{}' is not a number", s))),
            _ => Err(invalid("blank".to_string())),
        }
    }

    fn integer(&self, row: usize, column: &'static str) -> Result<i64, RecordError> {
        let value = self.decimal(row, column)?;
        if !value.fract().is_zero() {
            return Err(RecordError::InvalidField {
                column,
                reason: format!("{} is not a whole number", value),
            });
        }
        value.trunc().to_i64().ok_or_else(|| RecordError::InvalidField {
            column,
            reason: format!("{} is out of range", value),
        })
    }

    fn positive(&self, row: usize, column: &'static str) -> Result<u64, RecordError> {
        let value = self.integer(row, column)?;
        u64::try_from(value)
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| RecordError::InvalidField {
                column,
                reason: format!("{} must be positive", value),
            })
    }

    fn non_negative(&self, row: usize, column: &'static str) -> Result<Decimal, RecordError> {
        let value = self.decimal(row, column)?;
        if value.is_sign_negative() && !value.is_zero() {
            return Err(RecordError::InvalidField {
                column,
                reason: format!("{} must not be negative", value),
            });
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn headers() -> Vec<String> {
        REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect()
    }

    fn row(sl: i64, symbol: &str, buy: Decimal, sell: Decimal) -> Vec<CellValue> {
        vec![
            CellValue::Integer(sl),
            CellValue::Text(symbol.to_string()),
            CellValue::Integer(50),
            CellValue::Integer(2),
            CellValue::Integer(100),
            CellValue::Number(buy),
            CellValue::Number(sell),
        ]
    }

    #[test]
    fn test_validate_reports_missing_columns() {
        let table = InputTable::new(
            vec!["SL_N0".into(), "SYMBOL".into(), "LOT_SIZE".into()],
            vec![],
        );
        match table.validate() {
            Err(InputError::MissingColumns { missing }) => {
                assert_eq!(
                    missing,
                    vec!["NO_OF_LOTS", "TOTAL_LOT_SIZE", "BUY_VALUE", "SELL_VALUE"]
                );
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_empty_table() {
        let table = InputTable::new(headers(), vec![]);
        assert!(matches!(table.validate(), Err(InputError::Empty)));
    }

    #[test]
    fn test_parse_record_accepts_text_and_float_cells() {
        let mut cells = row(3, " NIFTY ", dec!(100.5), dec!(101));
        cells[2] = CellValue::Number(dec!(50.0));
        cells[5] = CellValue::Text("100.5".into());
        let table = InputTable::new(headers(), vec![cells]);

        let record = table.parse_record(0).unwrap();
        assert_eq!(record.sl_no, 3);
        assert_eq!(record.symbol, "NIFTY");
        assert_eq!(record.lot_size, 50);
        assert_eq!(record.buy_value, dec!(100.5));
    }

    #[test]
    fn test_parse_record_rejects_bad_fields() {
        let mut zero_lot = row(1, "NIFTY", dec!(1), dec!(1));
        zero_lot[2] = CellValue::Integer(0);
        let negative_buy = row(2, "NIFTY", dec!(-1), dec!(1));
        let mut fractional_sl = row(3, "NIFTY", dec!(1), dec!(1));
        fractional_sl[0] = CellValue::Number(dec!(3.5));

        let table = InputTable::new(headers(), vec![zero_lot, negative_buy, fractional_sl]);
        assert!(matches!(
            table.parse_record(0),
            Err(RecordError::InvalidField { column: "LOT_SIZE", .. })
        ));
        assert!(matches!(
            table.parse_record(1),
            Err(RecordError::InvalidField { column: "BUY_VALUE", .. })
        ));
        assert!(matches!(
            table.parse_record(2),
            Err(RecordError::InvalidField { column: "SL_N0", .. })
        ));
    }

    #[test]
    fn test_parse_record_rejects_overflowing_premium() {
        let mut huge_lots = row(2, "NIFTY", dec!(100.0), dec!(105.0));
        huge_lots[2] = CellValue::Integer(9_000_000_000_000_000_000);
        huge_lots[3] = CellValue::Integer(9_000_000_000_000_000_000);
        let table = InputTable::new(headers(), vec![huge_lots]);

        match table.parse_record(0) {
            Err(err @ RecordError::Overflow { figure: "TOTAL_PREMIUM_VALUE" }) => {
                assert!(err.to_string().contains("TOTAL_PREMIUM_VALUE"));
            }
            other => panic!("expected Overflow, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_records_rejects_duplicate_sequence() {
        let table = InputTable::new(
            headers(),
            vec![
                row(1, "NIFTY", dec!(1), dec!(1)),
                row(1, "NIFTY", dec!(2), dec!(2)),
            ],
        );
        assert!(matches!(
            table.parse_records(),
            Err(InputError::DuplicateSequence { sl_no: 1 })
        ));
    }

    #[test]
    fn test_report_symbol_comes_from_first_row() {
        let table = InputTable::new(
            headers(),
            vec![
                row(2, "BANKNIFTY", dec!(1), dec!(1)),
                row(1, "NIFTY", dec!(1), dec!(1)),
            ],
        );
        assert_eq!(table.report_symbol(), "BANKNIFTY");

        let mut blank = row(1, "", dec!(1), dec!(1));
        blank[1] = CellValue::Empty;
        let table = InputTable::new(headers(), vec![blank]);
        assert_eq!(table.report_symbol(), UNKNOWN_SYMBOL);
    }

    #[test]
    fn test_parameter_rows_follow_required_column_order() {
        let mut hdrs = headers();
        hdrs.reverse();
        let mut cells = row(9, "NIFTY", dec!(10), dec!(11));
        cells.reverse();
        let table = InputTable::new(hdrs, vec![cells]);

        let extract = table.parameter_rows();
        assert_eq!(extract[0][0], CellValue::Integer(9));
        assert_eq!(extract[0][6], CellValue::Number(dec!(11)));
    }
}
