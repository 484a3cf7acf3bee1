//! # Schema Validator
//!
//! Checks transformed records against required-type rules, producing a flat
//! ordered error list. Validation is a pure read-only pass: records are never
//! mutated, nothing short-circuits, and every violation across every record
//! is collected before returning.
//!
//! ## Rule Order (fixed, per record)
//! ```text
//! party block fields → invoiceNo → date → items non-empty
//!                    → per-item fields → record totals
//! ```
//!
//! String rules apply to fields that must be *absent or a string*; numeric
//! rules accept JSON numbers and numeric strings (the fail-soft coercion
//! downstream handles both identically).

use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use serde_json::Value;

use crate::transform::{ImportRecord, RawItem};

/// Longest error list shown in user-facing previews.
pub const VALIDATION_PREVIEW_LIMIT: usize = 5;

// =============================================================================
// Validation Error
// =============================================================================

/// One schema violation. Collected, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Index of the record in the transformed sequence (0-based).
    pub record_index: usize,
    /// Index of the offending item within the record, when item-scoped.
    pub item_index: Option<usize>,
    /// Field path, e.g. `supplierDetails.name` or `units`.
    pub field: String,
    /// What the rule expected, e.g. `must be a string`.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.item_index {
            Some(item) => write!(
                f,
                "Row {}, Item {}: {} {}",
                self.record_index + 1,
                item + 1,
                self.field,
                self.message
            ),
            None => write!(
                f,
                "Row {}: {} {}",
                self.record_index + 1,
                self.field,
                self.message
            ),
        }
    }
}

/// The validator's verdict over a whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// True when the batch may proceed to submission.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The first `limit` errors, for capped user-facing previews.
    pub fn preview(&self, limit: usize) -> &[ValidationError] {
        &self.errors[..self.errors.len().min(limit)]
    }

    /// How many errors the preview hides.
    pub fn overflow(&self, limit: usize) -> usize {
        self.errors.len().saturating_sub(limit)
    }
}

// =============================================================================
// Validator
// =============================================================================

/// Validates every record, collecting all violations in detection order.
pub fn validate_records(records: &[ImportRecord]) -> ValidationReport {
    let mut errors = Vec::new();
    for (index, record) in records.iter().enumerate() {
        validate_record(index, record, &mut errors);
    }
    ValidationReport { errors }
}

fn validate_record(index: usize, record: &ImportRecord, errors: &mut Vec<ValidationError>) {
    let party_key = record.kind.party_key();
    let mut record_error = |field: String, message: &str| {
        errors.push(ValidationError {
            record_index: index,
            item_index: None,
            field,
            message: message.to_string(),
        });
    };

    // Party block
    for (suffix, value) in [
        ("name", &record.party.name),
        ("contactNo", &record.party.contact_no),
        ("email", &record.party.email),
        ("gstIN", &record.party.gst_in),
    ] {
        if !is_string_like(value) {
            record_error(format!("{party_key}.{suffix}"), "must be a string");
        }
    }

    // Header fields
    if !is_string_like(&record.invoice_no) {
        record_error("invoiceNo".to_string(), "must be a string");
    }

    if let Some(date) = &record.date {
        if !is_valid_date(date) {
            record_error("date".to_string(), "must be a valid date");
        }
    }

    // Items
    if record.items.is_empty() {
        record_error("items".to_string(), "must contain at least one item");
    }

    for (item_index, item) in record.items.iter().enumerate() {
        validate_item(index, item_index, item, errors);
    }

    // Record totals
    for (field, value) in [("taxAmt", &record.tax_amt), ("finalAmt", &record.final_amt)] {
        if let Some(value) = value {
            if !is_numeric_like(value) {
                errors.push(ValidationError {
                    record_index: index,
                    item_index: None,
                    field: field.to_string(),
                    message: "must be a number".to_string(),
                });
            }
        }
    }
}

fn validate_item(
    record_index: usize,
    item_index: usize,
    item: &RawItem,
    errors: &mut Vec<ValidationError>,
) {
    let mut item_error = |field: &str, message: &str| {
        errors.push(ValidationError {
            record_index,
            item_index: Some(item_index),
            field: field.to_string(),
            message: message.to_string(),
        });
    };

    for (field, value) in [
        ("name", &item.name),
        ("hsnCode", &item.hsn_code),
        ("itemCode", &item.item_code),
    ] {
        if !is_string_like(value) {
            item_error(field, "must be a string");
        }
    }

    for (field, value) in [
        ("units", &item.units),
        ("unitCost", &item.unit_cost),
        ("gstPer", &item.gst_per),
        ("amt", &item.amt),
    ] {
        if !is_numeric_like(value) {
            item_error(field, "must be a number");
        }
    }
}

// =============================================================================
// Type Rules
// =============================================================================

/// Absent or a string. (Transform defaults missing text fields to `""`, so
/// in practice this rejects numeric/bool cells in text columns.)
fn is_string_like(value: &Value) -> bool {
    matches!(value, Value::Null | Value::String(_))
}

/// A JSON number, or a string that reads as one (blank counts as zero).
fn is_numeric_like(value: &Value) -> bool {
    match value {
        Value::Null | Value::Number(_) => true,
        Value::String(s) => {
            let s = s.trim();
            s.is_empty() || s.parse::<f64>().is_ok()
        }
        _ => false,
    }
}

fn is_valid_date(value: &Value) -> bool {
    match value {
        Value::String(s) => parse_flexible_date(s).is_some(),
        _ => false,
    }
}

/// Parses the date formats accepted across the import surface.
///
/// The template emits `%Y-%m-%d`; day-first forms and RFC 3339 timestamps
/// cover the files users actually upload.
pub fn parse_flexible_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for format in ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

// =============================================================================
// Unit Tests
// =============================================================================
