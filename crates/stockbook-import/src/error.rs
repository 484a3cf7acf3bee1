//! # Import Error Types
//!
//! The pipeline distinguishes three failure kinds:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Import Failure Kinds                                │
//! │                                                                         │
//! │  IngestError        fatal to the run - the file is unreadable;         │
//! │  (this module)      the pipeline halts, no rows are produced           │
//! │                                                                         │
//! │  ValidationError    collected, never raised - surfaced as a list,      │
//! │  (validate module)  submission blocked until the list is empty         │
//! │                                                                         │
//! │  ApiError           per-record during batch execution - counted as a   │
//! │  (stockbook-api)    failure, the batch continues                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// A spreadsheet or CSV document that could not be read at all.
///
/// Fatal to the current import attempt: no partial row set is ever produced.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The file could not be opened or read.
    #[error("Failed to read import file: {0}")]
    Io(#[from] std::io::Error),

    /// The workbook is malformed or not a spreadsheet at all.
    #[error("Failed to parse workbook: {0}")]
    Workbook(String),

    /// The CSV document is malformed.
    #[error("Failed to parse CSV at row {row}: {detail}")]
    Csv { row: usize, detail: String },

    /// The file extension maps to no supported reader.
    #[error("Unsupported import format: {0} (expected .xlsx, .xls or .csv)")]
    UnsupportedFormat(String),
}

/// A failure while writing the sample template file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write template file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to build workbook: {0}")]
    Workbook(String),

    #[error("Failed to write CSV: {0}")]
    Csv(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_error_messages() {
        let err = IngestError::UnsupportedFormat("pdf".to_string());
        assert_eq!(
            err.to_string(),
            "Unsupported import format: pdf (expected .xlsx, .xls or .csv)"
        );

        let err = IngestError::Csv {
            row: 3,
            detail: "unequal lengths".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to parse CSV at row 3: unequal lengths");
    }
}
