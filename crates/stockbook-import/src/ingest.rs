//! # Tabular Ingestor
//!
//! Parses an externally supplied spreadsheet (or CSV) into [`ImportRow`]s,
//! one per data row, keyed by the source column headers.
//!
//! ## Contract
//! - The first worksheet is read; its first row is the header row.
//! - Header order carries no meaning; rows are plain key → value maps.
//! - Empty cells are omitted from the map entirely (a missing key, not a
//!   null), which is what the downstream defaulting rules key off.
//! - A malformed/unreadable document raises a single [`IngestError`] and the
//!   pipeline halts before validation; no partial row set is produced.
//!
//! Date cells are rendered as ISO `YYYY-MM-DD` strings so the validator only
//! ever sees text dates.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader, Xlsx};
use serde::Serialize;
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::error::IngestError;

// =============================================================================
// Import Row
// =============================================================================

/// One raw data row from the source document.
///
/// Ephemeral: rows are never persisted, only transformed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRow {
    /// 1-based physical row in the source file (the header is row 1, so the
    /// first data row is 2). Used for provenance in error reporting.
    pub source_row: usize,

    /// Header → cell value. Empty cells are absent.
    pub cells: Map<String, Value>,
}

impl ImportRow {
    /// Looks up a cell by column header.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.cells.get(key)
    }
}

// =============================================================================
// Entry Point
// =============================================================================

/// Reads an import file, dispatching on its extension.
pub fn read_rows(path: &Path) -> Result<Vec<ImportRow>, IngestError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "xlsx" | "xls" => {
            let mut workbook =
                open_workbook_auto(path).map_err(|e| IngestError::Workbook(e.to_string()))?;
            let range = first_sheet_range(&mut workbook)?;
            Ok(rows_from_range(&range))
        }
        "csv" => {
            let file = File::open(path)?;
            read_csv_rows(file)
        }
        other => Err(IngestError::UnsupportedFormat(other.to_string())),
    }
}

/// Reads an xlsx workbook from an in-memory reader.
pub fn read_xlsx_rows<R: Read + Seek>(reader: R) -> Result<Vec<ImportRow>, IngestError> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(reader).map_err(|e| IngestError::Workbook(e.to_string()))?;
    let range = first_sheet_range(&mut workbook)?;
    Ok(rows_from_range(&range))
}

/// Reads CSV data with a header row.
///
/// Cells that parse fully as numbers become JSON numbers, matching how a
/// spreadsheet application would have typed them.
pub fn read_csv_rows<R: Read>(reader: R) -> Result<Vec<ImportRow>, IngestError> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv
        .headers()
        .map_err(|e| IngestError::Csv {
            row: 1,
            detail: e.to_string(),
        })?
        .clone();

    let mut rows = Vec::new();
    for (i, result) in csv.records().enumerate() {
        // Header is physical row 1, so data row i sits at i + 2
        let source_row = i + 2;
        let record = result.map_err(|e| IngestError::Csv {
            row: source_row,
            detail: e.to_string(),
        })?;

        let mut cells = Map::new();
        for (header, field) in headers.iter().zip(record.iter()) {
            let header = header.trim();
            let field = field.trim();
            if header.is_empty() || field.is_empty() {
                continue;
            }
            cells.insert(header.to_string(), csv_field_to_value(field));
        }

        rows.push(ImportRow { source_row, cells });
    }

    debug!(rows = rows.len(), "Ingested CSV document");
    Ok(rows)
}

// =============================================================================
// Workbook Helpers
// =============================================================================

/// Grabs the first worksheet of any calamine reader.
///
/// `open_workbook_auto` and `Xlsx::new` yield different reader types; this
/// keeps the fallible "first sheet or bust" logic in one place.
fn first_sheet_range<RS, R>(workbook: &mut R) -> Result<Range<Data>, IngestError>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::Workbook("workbook contains no sheets".to_string()))?
        .map_err(|e| IngestError::Workbook(e.to_string()))
}

fn rows_from_range(range: &Range<Data>) -> Vec<ImportRow> {
    let mut iter = range.rows();
    let headers: Vec<Option<String>> = match iter.next() {
        Some(row) => row.iter().map(header_to_string).collect(),
        None => return Vec::new(),
    };

    let mut rows = Vec::new();
    for (i, raw) in iter.enumerate() {
        let mut cells = Map::new();
        for (header, cell) in headers.iter().zip(raw.iter()) {
            let (Some(header), Some(value)) = (header, cell_to_value(cell)) else {
                continue;
            };
            cells.insert(header.clone(), value);
        }
        rows.push(ImportRow {
            source_row: i + 2,
            cells,
        });
    }

    debug!(rows = rows.len(), "Ingested workbook");
    rows
}

fn header_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        other => Some(other.to_string()),
    }
}

/// Converts a workbook cell to a JSON value. `None` means "empty cell".
fn cell_to_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| Value::String(s.to_string()))
        }
        Data::Int(i) => Some(Value::Number((*i).into())),
        Data::Float(f) => Number::from_f64(*f).map(Value::Number),
        Data::Bool(b) => Some(Value::Bool(*b)),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| Value::String(d.date().format("%Y-%m-%d").to_string())),
        Data::DateTimeIso(s) => Some(Value::String(s.clone())),
        Data::DurationIso(s) => Some(Value::String(s.clone())),
    }
}

fn csv_field_to_value(field: &str) -> Value {
    if let Ok(i) = field.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Ok(f) = field.parse::<f64>() {
        if let Some(n) = Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(field.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE_CSV: &str = "\
invoiceNo,supplierName,item1Name,item1Units,item1UnitCost
PUR-001,ABC Suppliers Ltd,Raw Material A,100,50
PUR-002,XYZ Manufacturing,Component B,50,120.5
";

    #[test]
    fn test_csv_rows_keyed_by_header() {
        let rows = read_csv_rows(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(first.source_row, 2);
        assert_eq!(first.get("invoiceNo"), Some(&json!("PUR-001")));
        assert_eq!(first.get("item1Units"), Some(&json!(100)));

        let second = &rows[1];
        assert_eq!(second.source_row, 3);
        assert_eq!(second.get("item1UnitCost"), Some(&json!(120.5)));
    }

    #[test]
    fn test_csv_empty_cells_are_absent() {
        let csv = "invoiceNo,supplierName,date\nPUR-001,,2026-08-01\n";
        let rows = read_csv_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].get("supplierName").is_none());
        assert_eq!(rows[0].get("date"), Some(&json!("2026-08-01")));
    }

    #[test]
    fn test_csv_headers_only_yields_no_rows() {
        let rows = read_csv_rows("invoiceNo,supplierName\n".as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_malformed_xlsx_is_a_single_fatal_error() {
        let garbage = std::io::Cursor::new(b"this is not a zip archive".to_vec());
        let err = read_xlsx_rows(garbage).unwrap_err();
        assert!(matches!(err, IngestError::Workbook(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = read_rows(Path::new("orders.pdf")).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_csv_numeric_strings_become_numbers() {
        assert_eq!(csv_field_to_value("42"), json!(42));
        assert_eq!(csv_field_to_value("12.5"), json!(12.5));
        assert_eq!(csv_field_to_value("PUR-001"), json!("PUR-001"));
    }
}
