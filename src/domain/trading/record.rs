use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Input columns every trade sheet must carry, in extract order.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "SL_N0",
    "SYMBOL",
    "LOT_SIZE",
    "NO_OF_LOTS",
    "TOTAL_LOT_SIZE",
    "BUY_VALUE",
    "SELL_VALUE",
];

/// A single spreadsheet cell after type sniffing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Integer(i64),
    Number(Decimal),
    Text(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Number(d) => write!(f, "{}", d),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// One validated trade leg. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeRecord {
    /// `SL_N0`: the only ordering key honored downstream.
    pub sl_no: i64,
    pub symbol: String,
    pub lot_size: u64,
    pub no_of_lots: u64,
    /// Taken from the input as-is; see [`TradeRecord::lot_size_mismatch`].
    pub total_lot_size: u64,
    pub buy_value: Decimal,
    pub sell_value: Decimal,
}

impl TradeRecord {
    /// Buy plus sell price of one unit. `None` on overflow, as for every
    /// derived figure below.
    pub fn premium_value(&self) -> Option<Decimal> {
        self.buy_value.checked_add(self.sell_value)
    }

    /// `(buy + sell) × total lot size`, the base of the brokerage percentage.
    pub fn turnover(&self) -> Option<Decimal> {
        self.premium_value()?.checked_mul(Decimal::from(self.total_lot_size))
    }

    /// `(buy + sell) × lots × lot size`, recomputed from the lot columns.
    pub fn total_premium_value(&self) -> Option<Decimal> {
        self.premium_value()?
            .checked_mul(Decimal::from(self.no_of_lots))?
            .checked_mul(Decimal::from(self.lot_size))
    }

    /// Returns the recomputed quantity when `TOTAL_LOT_SIZE` disagrees with
    /// `LOT_SIZE × NO_OF_LOTS`.
    pub fn lot_size_mismatch(&self) -> Option<u64> {
        let expected = self.lot_size.saturating_mul(self.no_of_lots);
        (expected != self.total_lot_size).then_some(expected)
    }
}
