#![allow(dead_code)]

use brokerage_report::domain::trading::record::REQUIRED_COLUMNS;
use std::path::{Path, PathBuf};

/// One input line: SL_N0, SYMBOL, LOT_SIZE, NO_OF_LOTS, TOTAL_LOT_SIZE, BUY_VALUE, SELL_VALUE.
pub type Leg<'a> = (i64, &'a str, u64, u64, u64, &'a str, &'a str);

pub fn write_csv(dir: &Path, name: &str, legs: &[Leg]) -> PathBuf {
    let mut content = REQUIRED_COLUMNS.join(",");
    content.push('\n');
    for (sl, symbol, lot, lots, total, buy, sell) in legs {
        content.push_str(&format!("{sl},{symbol},{lot},{lots},{total},{buy},{sell}\n"));
    }
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// `n` NIFTY legs numbered 1..=n, listed in reverse so file order differs
/// from `SL_N0` order.
pub fn write_reversed_csv(dir: &Path, name: &str, n: i64) -> PathBuf {
    let buys: Vec<(i64, String)> = (1..=n).rev().map(|sl| (sl, format!("{}.5", 100 + sl))).collect();
    let legs: Vec<Leg> = buys
        .iter()
        .map(|(sl, buy)| (*sl, "NIFTY", 50, 2, 100, buy.as_str(), "105.0"))
        .collect();
    write_csv(dir, name, &legs)
}
