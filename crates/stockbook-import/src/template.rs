//! # Template Export
//!
//! Emits a sample import file carrying the exact column contract the
//! ingest/transform side consumes, with two illustrative rows. Seeding users
//! with a known-good file is the cheapest way to keep uploads well-formed:
//! a file produced here round-trips through ingest → transform → validate
//! with zero errors.

use std::io::Write;
use std::path::Path;

use chrono::Utc;
use rust_xlsxwriter::Workbook;
use serde_json::{json, Value};

use stockbook_core::OrderKind;

use crate::error::ExportError;

// =============================================================================
// Sample Data
// =============================================================================

/// The template's column/value pairs, in display order.
///
/// Column names are built from the same conventions the transformer reads:
/// the counterparty prefix from [`OrderKind::party_prefix`] and the `item1`
/// group columns.
pub fn sample_rows(kind: OrderKind) -> Vec<Vec<(String, Value)>> {
    let p = kind.party_prefix();
    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();

    let (invoice_1, invoice_2) = match kind {
        OrderKind::Purchase => ("PUR-001", "PUR-002"),
        OrderKind::Sales => ("SAL-001", "SAL-002"),
    };

    let row = |invoice: &str,
               name: &str,
               contact: &str,
               email: &str,
               gstin: &str,
               line1: &str,
               line2: &str,
               city: &str,
               state: &str,
               pincode: i64,
               item: [(&str, Value); 7],
               tax_amt: i64,
               final_amt: i64,
               warehouse: &str| {
        let mut cells: Vec<(String, Value)> = vec![
            ("invoiceNo".into(), json!(invoice)),
            ("date".into(), json!(today)),
            (format!("{p}Name"), json!(name)),
            (format!("{p}ContactNo"), json!(contact)),
            (format!("{p}Email"), json!(email)),
            (format!("{p}GSTIN"), json!(gstin)),
            (format!("{p}AddressLine1"), json!(line1)),
            (format!("{p}AddressLine2"), json!(line2)),
            (format!("{p}City"), json!(city)),
            (format!("{p}State"), json!(state)),
            (format!("{p}Pincode"), json!(pincode)),
            (format!("{p}Country"), json!("India")),
        ];
        for (suffix, value) in item {
            cells.push((format!("item1{suffix}"), value));
        }
        cells.push(("taxAmt".into(), json!(tax_amt)));
        cells.push(("finalAmt".into(), json!(final_amt)));
        cells.push(("warehouseID".into(), json!(warehouse)));
        cells
    };

    vec![
        row(
            invoice_1,
            "ABC Suppliers Ltd",
            "1234567890",
            "contact@abcsuppliers.com",
            "22AAAAA0000A1Z5",
            "123 Supplier Street",
            "Business District",
            "Mumbai",
            "Maharashtra",
            400001,
            [
                ("Name", json!("Raw Material A")),
                ("HSN", json!("HSN001")),
                ("Code", json!("RM-A")),
                ("Units", json!(100)),
                ("UnitCost", json!(50)),
                ("GSTPer", json!(18)),
                ("Amt", json!(5900)),
            ],
            900,
            5900,
            "warehouserandomid123",
        ),
        row(
            invoice_2,
            "XYZ Manufacturing",
            "9876543210",
            "info@xyzmanufacturing.com",
            "27BBBBB0000B1Z3",
            "456 Industry Avenue",
            "Industrial Zone",
            "Delhi",
            "Delhi",
            110001,
            [
                ("Name", json!("Component B")),
                ("HSN", json!("HSN002")),
                ("Code", json!("COMP-B")),
                ("Units", json!(50)),
                ("UnitCost", json!(120)),
                ("GSTPer", json!(12)),
                ("Amt", json!(6720)),
            ],
            720,
            6720,
            "",
        ),
    ]
}

fn columns(rows: &[Vec<(String, Value)>]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for (key, _) in row {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

fn cell<'a>(row: &'a [(String, Value)], column: &str) -> Option<&'a Value> {
    row.iter()
        .find(|(key, _)| key == column)
        .map(|(_, value)| value)
}

// =============================================================================
// XLSX Writer
// =============================================================================

/// Writes the sample workbook to a file.
pub fn write_template_xlsx(path: &Path, kind: OrderKind) -> Result<(), ExportError> {
    let mut workbook = build_workbook(kind)?;
    workbook
        .save(path)
        .map_err(|e| ExportError::Workbook(e.to_string()))
}

/// Builds the sample workbook in memory (used by the round-trip tests).
pub fn write_template_xlsx_to_buffer(kind: OrderKind) -> Result<Vec<u8>, ExportError> {
    let mut workbook = build_workbook(kind)?;
    workbook
        .save_to_buffer()
        .map_err(|e| ExportError::Workbook(e.to_string()))
}

fn build_workbook(kind: OrderKind) -> Result<Workbook, ExportError> {
    let rows = sample_rows(kind);
    let columns = columns(&rows);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet
        .set_name(match kind {
            OrderKind::Purchase => "PurchaseData",
            OrderKind::Sales => "SalesData",
        })
        .map_err(|e| ExportError::Workbook(e.to_string()))?;

    for (c, column) in columns.iter().enumerate() {
        sheet
            .write_string(0, c as u16, column)
            .map_err(|e| ExportError::Workbook(e.to_string()))?;
    }

    for (r, row) in rows.iter().enumerate() {
        for (c, column) in columns.iter().enumerate() {
            let Some(value) = cell(row, column) else {
                continue;
            };
            let (r, c) = ((r + 1) as u32, c as u16);
            match value {
                Value::Number(n) => {
                    sheet
                        .write_number(r, c, n.as_f64().unwrap_or_default())
                        .map_err(|e| ExportError::Workbook(e.to_string()))?;
                }
                Value::String(s) if !s.is_empty() => {
                    sheet
                        .write_string(r, c, s)
                        .map_err(|e| ExportError::Workbook(e.to_string()))?;
                }
                _ => {}
            }
        }
    }

    Ok(workbook)
}

// =============================================================================
// CSV Writer
// =============================================================================

/// Writes the sample rows as CSV to any writer.
pub fn write_template_csv<W: Write>(writer: W, kind: OrderKind) -> Result<(), ExportError> {
    let rows = sample_rows(kind);
    let columns = columns(&rows);

    let mut csv = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(&columns)
        .map_err(|e| ExportError::Csv(e.to_string()))?;

    for row in &rows {
        let record: Vec<String> = columns
            .iter()
            .map(|column| match cell(row, column) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => String::new(),
            })
            .collect();
        csv.write_record(&record)
            .map_err(|e| ExportError::Csv(e.to_string()))?;
    }

    csv.flush().map_err(|e| ExportError::Csv(e.to_string()))?;
    Ok(())
}

/// Writes the sample CSV to a file.
pub fn write_template_csv_file(path: &Path, kind: OrderKind) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    write_template_csv(file, kind)
}

// =============================================================================
// Unit Tests
// =============================================================================
