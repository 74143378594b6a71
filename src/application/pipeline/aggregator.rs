use crate::domain::trading::outcome::{Outcome, OutputRow};
use tracing::warn;

/// Rows for the summary report plus what was left out of it.
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    pub rows: Vec<OutputRow>,
    pub failures: Vec<FailedRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedRow {
    pub row: usize,
    pub sl_no: Option<i64>,
    pub error: String,
}

/// Drops failures, restores `SL_N0` order and merges each success into a
/// report row. Completion order of `outcomes` is irrelevant.
pub fn aggregate(outcomes: Vec<Outcome>) -> Aggregate {
    let mut rows = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();

    for outcome in outcomes {
        match outcome {
            Outcome::Success {
                row,
                record,
                breakdown,
            } => match OutputRow::merge(&record, &breakdown) {
                Ok(merged) => rows.push(merged),
                Err(e) => failures.push(excluded(row, Some(record.sl_no), e.to_string())),
            },
            Outcome::Failure { row, sl_no, error } => failures.push(excluded(row, sl_no, error)),
        }
    }

    rows.sort_by_key(|r| r.sl_no);
    failures.sort_by_key(|f| f.row);

    Aggregate { rows, failures }
}

fn excluded(row: usize, sl_no: Option<i64>, error: String) -> FailedRow {
    match sl_no {
        Some(sl) => warn!("Excluding SL_N0 {} (row {}) from report: {}", sl, row + 1, error),
        None => warn!("Excluding row {} from report: {}", row + 1, error),
    }
    FailedRow { row, sl_no, error }
}
