use crate::domain::errors::OutputError;
use crate::domain::trading::outcome::{OutputRow, SUMMARY_COLUMNS};
use crate::domain::trading::record::{CellValue, REQUIRED_COLUMNS};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::{Path, PathBuf};
use tracing::info;

/// `{SYMBOL}_parameter.xlsx`
pub fn parameter_file_name(symbol: &str) -> String {
    format!("{}_parameter.xlsx", file_safe(symbol))
}

/// `{SYMBOL}SUMMARY_REPORT{stamp}_intra_equity.xlsx`
pub fn summary_file_name(symbol: &str, stamp: &str) -> String {
    format!("{}SUMMARY_REPORT{}_intra_equity.xlsx", file_safe(symbol), stamp)
}

/// Symbol text comes straight from the sheet; keep it to a single path
/// component.
fn file_safe(symbol: &str) -> String {
    symbol
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Write the seven required input columns of every row to
/// `dir/{SYMBOL}_parameter.xlsx`.
pub fn write_parameter_extract(
    dir: &Path,
    symbol: &str,
    rows: &[Vec<CellValue>],
) -> Result<PathBuf, OutputError> {
    let path = dir.join(parameter_file_name(symbol));
    write_sheet(&path, "Parameters", &REQUIRED_COLUMNS, rows.iter().map(|r| r.as_slice()))?;
    info!("Writer: parameter extract ({} rows) -> {}", rows.len(), path.display());
    Ok(path)
}

/// Write the aggregated summary to `dir/{SYMBOL}SUMMARY_REPORT{stamp}_intra_equity.xlsx`,
/// creating `dir` when missing.
pub fn write_summary_report(
    dir: &Path,
    symbol: &str,
    stamp: &str,
    rows: &[OutputRow],
) -> Result<PathBuf, OutputError> {
    ensure_dir(dir)?;
    let path = dir.join(summary_file_name(symbol, stamp));
    write_sheet(&path, "Summary", &SUMMARY_COLUMNS, rows.iter().map(|r| r.cells.as_slice()))?;
    info!("Writer: summary report ({} rows) -> {}", rows.len(), path.display());
    Ok(path)
}

pub fn ensure_dir(dir: &Path) -> Result<(), OutputError> {
    std::fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_sheet<'a>(
    path: &Path,
    sheet_name: &str,
    headers: &[&str],
    rows: impl Iterator<Item = &'a [CellValue]>,
) -> Result<(), OutputError> {
    let to_output = |e: XlsxError| OutputError::Write {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name).map_err(to_output)?;

    let bold = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(to_output)?;
    }

    for (i, cells) in rows.enumerate() {
        let row = (i + 1) as u32;
        for (col, cell) in cells.iter().enumerate() {
            write_cell(worksheet, row, col as u16, cell).map_err(to_output)?;
        }
    }

    workbook.save(path).map_err(to_output)
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &CellValue) -> Result<(), XlsxError> {
    match cell {
        CellValue::Empty => {}
        CellValue::Integer(i) => {
            worksheet.write_number(row, col, *i as f64)?;
        }
        CellValue::Number(d) => match d.to_f64() {
            Some(n) => {
                worksheet.write_number(row, col, n)?;
            }
            None => {
                worksheet.write_string(row, col, d.to_string())?;
            }
        },
        CellValue::Text(s) => {
            worksheet.write_string(row, col, s)?;
        }
    }
    Ok(())
}
