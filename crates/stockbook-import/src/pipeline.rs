//! # Import Pipeline Front Half
//!
//! Glues ingest → transform → validate into the preview callers act on.
//! Submission (the back half) lives in [`crate::executor`] and only runs
//! once the preview says the batch is ready.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use stockbook_core::OrderKind;

use crate::error::IngestError;
use crate::ingest::{read_rows, ImportRow};
use crate::transform::{transform_rows, ImportRecord};
use crate::validate::{validate_records, ValidationReport};

/// Everything known about an import file before submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreview {
    /// The raw ingested rows (for UI preview tables).
    pub rows: Vec<ImportRow>,
    /// The transformed records that survived the skip policy.
    pub records: Vec<ImportRecord>,
    /// The validator's verdict over those records.
    pub report: ValidationReport,
}

impl ImportPreview {
    /// Submission is allowed only for a non-empty, fully valid batch.
    pub fn is_ready(&self) -> bool {
        !self.records.is_empty() && self.report.is_valid()
    }

    /// Total line items across all records (operator-facing summary).
    pub fn total_items(&self) -> usize {
        self.records.iter().map(|r| r.items.len()).sum()
    }
}

/// Runs the front half of the pipeline over a file on disk.
///
/// An unreadable document fails here with a single [`IngestError`]; rows are
/// never partially produced.
pub fn prepare_import(path: &Path, kind: OrderKind) -> Result<ImportPreview, IngestError> {
    let rows = read_rows(path)?;
    Ok(prepare_rows(rows, kind))
}

/// Runs transform + validate over already-ingested rows.
pub fn prepare_rows(rows: Vec<ImportRow>, kind: OrderKind) -> ImportPreview {
    let records = transform_rows(&rows, kind);
    let report = validate_records(&records);

    info!(
        rows = rows.len(),
        records = records.len(),
        errors = report.errors.len(),
        "Prepared import preview"
    );

    ImportPreview {
        rows,
        records,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::read_csv_rows;

    const MIXED_CSV: &str = "\
invoiceNo,supplierName,item1Name,item1Units,item1UnitCost
PUR-001,ABC Suppliers Ltd,Raw Material A,100,50
,No Invoice Co,Widget,5,10
PUR-003,Items Missing Inc,,,
PUR-004,Typo Industries,Bracket,many,10
";

    #[test]
    fn test_preview_applies_skip_policy_then_validates() {
        let rows = read_csv_rows(MIXED_CSV.as_bytes()).unwrap();
        let preview = prepare_rows(rows, OrderKind::Purchase);

        // 4 data rows: one skipped for missing invoice, one dropped for zero
        // items, two become records
        assert_eq!(preview.rows.len(), 4);
        assert_eq!(preview.records.len(), 2);
        assert_eq!(preview.total_items(), 2);

        // The silent skips produce NO validation errors; the bad units do
        assert_eq!(preview.report.errors.len(), 1);
        assert_eq!(preview.report.errors[0].field, "units");
        assert!(!preview.is_ready());
    }

    #[test]
    fn test_preview_ready_when_clean() {
        let csv = "\
invoiceNo,supplierName,item1Name,item1Units,item1UnitCost
PUR-001,ABC Suppliers Ltd,Raw Material A,100,50
";
        let rows = read_csv_rows(csv.as_bytes()).unwrap();
        let preview = prepare_rows(rows, OrderKind::Purchase);
        assert!(preview.is_ready());
    }

    #[test]
    fn test_preview_not_ready_when_no_records() {
        let csv = "invoiceNo,supplierName\nPUR-001,ABC\n";
        let rows = read_csv_rows(csv.as_bytes()).unwrap();
        let preview = prepare_rows(rows, OrderKind::Purchase);

        // Zero-item rows are dropped silently; an empty batch is not ready
        // even though the error list is empty
        assert!(preview.records.is_empty());
        assert!(preview.report.is_valid());
        assert!(!preview.is_ready());
    }
}
