//! # stockbook-import: Bulk Import Pipeline
//!
//! Turns an externally supplied spreadsheet into persisted orders, with a
//! validation gate in the middle.
//!
//! ## Pipeline Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Import Pipeline                                    │
//! │                                                                         │
//! │  .xlsx / .csv file                                                      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  ingest ──────► Vec<ImportRow>        fatal IngestError on bad files   │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  transform ───► Vec<ImportRecord>     silent skip policy applies here  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  validate ────► ValidationReport      collect-all, submission gate     │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  executor ────► ImportBatchResult     sequential, partial-success      │
//! │        │            (via stockbook-api::OrderSubmitter)                │
//! │        ▼                                                                │
//! │  persistence collaborator (external REST endpoint)                     │
//! │                                                                         │
//! │  template ◄─── the inverse: emits a sample file that round-trips       │
//! │                through the pipeline with zero errors                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pipeline operates on an immutable snapshot of ingested rows for the
//! duration of one run; the only suspending operation is submission.

pub mod error;
pub mod executor;
pub mod ingest;
pub mod pipeline;
pub mod template;
pub mod transform;
pub mod validate;

pub use error::{ExportError, IngestError};
pub use executor::{execute_batch, ImportBatchResult, ImportFailure};
pub use ingest::ImportRow;
pub use pipeline::{prepare_import, prepare_rows, ImportPreview};
pub use template::{write_template_csv_file, write_template_xlsx};
pub use transform::{ImportRecord, RawItem, RawParty};
pub use validate::{
    validate_records, ValidationError, ValidationReport, VALIDATION_PREVIEW_LIMIT,
};
