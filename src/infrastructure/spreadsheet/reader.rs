use crate::domain::errors::InputError;
use crate::domain::trading::record::CellValue;
use crate::domain::trading::table::InputTable;
use calamine::{Data, Reader, open_workbook_auto};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Workbook extensions handed to calamine.
const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Load the first sheet of `path` into an [`InputTable`].
///
/// The format is chosen by extension: `.csv` goes through the csv reader,
/// workbook formats through calamine.
pub fn read_table(path: &Path) -> Result<InputTable, InputError> {
    if !path.is_file() {
        return Err(InputError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let table = match extension.as_str() {
        "csv" => read_csv(path)?,
        ext if WORKBOOK_EXTENSIONS.contains(&ext) => read_workbook(path)?,
        _ => return Err(InputError::UnsupportedFormat { extension }),
    };

    info!(
        "Reader: loaded {} rows x {} columns from {}",
        table.len(),
        table.headers().len(),
        path.display()
    );
    Ok(table)
}

fn read_csv(path: &Path) -> Result<InputTable, InputError> {
    let unreadable = |e: csv::Error| InputError::Unreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(unreadable)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(unreadable)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(unreadable)?;
        let row: Vec<CellValue> = record.iter().map(sniff_text).collect();
        if row.iter().all(CellValue::is_empty) {
            continue;
        }
        rows.push(row);
    }

    Ok(InputTable::new(headers, rows))
}

fn read_workbook(path: &Path) -> Result<InputTable, InputError> {
    let unreadable = |reason: String| InputError::Unreadable {
        path: path.to_path_buf(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| unreadable(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| unreadable("workbook has no sheets".to_string()))?
        .map_err(|e| unreadable(e.to_string()))?;

    let mut lines = range.rows();
    let Some(header_row) = lines.next() else {
        return Ok(InputTable::default());
    };
    let headers: Vec<String> = header_row.iter().map(|c| from_data(c).to_string()).collect();

    let rows: Vec<Vec<CellValue>> = lines
        .map(|line| line.iter().map(from_data).collect::<Vec<_>>())
        .filter(|row| !row.iter().all(CellValue::is_empty))
        .collect();

    Ok(InputTable::new(headers, rows))
}

/// Integer, then decimal, then text. Blank cells are `Empty`.
fn sniff_text(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(d) = Decimal::from_str(trimmed) {
        return CellValue::Number(d);
    }
    CellValue::Text(raw.to_string())
}

fn from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Integer(*i),
        // Spreadsheet apps store every number as a float.
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => CellValue::Integer(*f as i64),
        Data::Float(f) => Decimal::from_f64(*f)
            .map(|d| CellValue::Number(d.normalize()))
            .unwrap_or_else(|| CellValue::Text(f.to_string())),
        Data::String(s) => sniff_text(s),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        other => CellValue::Text(other.to_string()),
    }
}
