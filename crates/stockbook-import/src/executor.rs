//! # Batch Import Executor
//!
//! Submits validated records one at a time to the persistence collaborator,
//! tracking per-record success/failure.
//!
//! ## Execution Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Batch Execution Flow                                 │
//! │                                                                         │
//! │  validated records                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for each record (strictly sequential, in order):                      │
//! │       │                                                                 │
//! │       ├── to_order() ──► submit_order() ──► ok?                        │
//! │       │                                        │                        │
//! │       │              ┌─────────────────────────┤                        │
//! │       │              ▼                         ▼                        │
//! │       │         succeeded += 1          failed += 1                     │
//! │       │                                 failures.push(record)           │
//! │       │                                 CONTINUE with next record       │
//! │       ▼                                                                 │
//! │  ImportBatchResult { attempted, succeeded, failed, failures }          │
//! │                                                                         │
//! │  NO abort-on-first-failure. NO rollback of prior successes.            │
//! │  A batch can end up partially applied; the result makes that visible.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is deliberately no concurrent fan-out: ordering is part of the
//! contract, and the persistence endpoint is an opaque unary operation.
//! Cancellation mid-batch is not supported; dropping the future abandons the
//! remaining submissions.

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use stockbook_api::OrderSubmitter;

use crate::transform::ImportRecord;

// =============================================================================
// Batch Result
// =============================================================================

/// One record that failed to submit, with its originating record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportFailure {
    /// Index of the record in the submitted sequence (0-based).
    pub record_index: usize,
    /// Invoice number of the failed record, for operator-facing summaries.
    pub invoice_no: String,
    /// The submission error, rendered.
    pub error: String,
    /// The record itself, so callers can offer a retry.
    pub record: ImportRecord,
}

/// The outcome of one batch run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBatchResult {
    /// Identifier of this run, threaded through the logs.
    pub run_id: Uuid,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Failures in detection order.
    pub failures: Vec<ImportFailure>,
}

impl ImportBatchResult {
    /// True when every attempted record was persisted.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

// =============================================================================
// Executor
// =============================================================================

/// Submits `records` strictly sequentially, continuing past failures.
pub async fn execute_batch(
    submitter: &dyn OrderSubmitter,
    records: &[ImportRecord],
) -> ImportBatchResult {
    let run_id = Uuid::new_v4();
    info!(%run_id, count = records.len(), "Starting import batch");

    let mut result = ImportBatchResult {
        run_id,
        attempted: 0,
        succeeded: 0,
        failed: 0,
        failures: Vec::new(),
    };

    for (record_index, record) in records.iter().enumerate() {
        let order = record.to_order();
        result.attempted += 1;

        match submitter.submit_order(&order).await {
            Ok(()) => {
                result.succeeded += 1;
            }
            Err(err) => {
                result.failed += 1;
                warn!(
                    %run_id,
                    record = record_index,
                    invoice = %order.invoice_no,
                    error = %err,
                    "Record submission failed, continuing batch"
                );
                result.failures.push(ImportFailure {
                    record_index,
                    invoice_no: order.invoice_no.clone(),
                    error: err.to_string(),
                    record: record.clone(),
                });
            }
        }
    }

    info!(
        %run_id,
        attempted = result.attempted,
        succeeded = result.succeeded,
        failed = result.failed,
        "Import batch finished"
    );
    result
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use stockbook_api::{ApiError, ApiResult};
    use stockbook_core::{Order, OrderKind};

    use crate::ingest::ImportRow;
    use crate::transform::transform_row;

    /// Submitter that fails for a configured set of invoice numbers and
    /// records the order of every attempt.
    struct ScriptedSubmitter {
        fail_invoices: Vec<String>,
        submitted: Mutex<Vec<String>>,
    }

    impl ScriptedSubmitter {
        fn failing_on(invoices: &[&str]) -> Self {
            ScriptedSubmitter {
                fail_invoices: invoices.iter().map(|s| s.to_string()).collect(),
                submitted: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl OrderSubmitter for ScriptedSubmitter {
        async fn submit_order(&self, order: &Order) -> ApiResult<()> {
            self.submitted
                .lock()
                .unwrap()
                .push(order.invoice_no.clone());
            if self.fail_invoices.contains(&order.invoice_no) {
                return Err(ApiError::Status {
                    status: 500,
                    detail: "boom".to_string(),
                });
            }
            Ok(())
        }
    }

    fn record(invoice: &str) -> ImportRecord {
        let cells = json!({
            "invoiceNo": invoice,
            "supplierName": "ABC Suppliers Ltd",
            "item1Name": "Widget",
            "item1Units": 1,
            "item1UnitCost": 10
        });
        let serde_json::Value::Object(cells) = cells else {
            unreachable!();
        };
        transform_row(
            &ImportRow {
                source_row: 2,
                cells,
            },
            OrderKind::Purchase,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_failure_mid_batch_does_not_halt() {
        let submitter = ScriptedSubmitter::failing_on(&["PUR-002"]);
        let records = vec![record("PUR-001"), record("PUR-002"), record("PUR-003")];

        let result = execute_batch(&submitter, &records).await;

        assert_eq!(result.attempted, 3);
        assert_eq!(result.succeeded, 2);
        assert_eq!(result.failed, 1);
        assert!(!result.is_complete());

        // Records 1 and 3 were persisted despite record 2's failure
        let submitted = submitter.submitted.lock().unwrap();
        assert_eq!(*submitted, vec!["PUR-001", "PUR-002", "PUR-003"]);
    }

    #[tokio::test]
    async fn test_failures_carry_originating_record() {
        let submitter = ScriptedSubmitter::failing_on(&["PUR-002"]);
        let records = vec![record("PUR-001"), record("PUR-002")];

        let result = execute_batch(&submitter, &records).await;

        assert_eq!(result.failures.len(), 1);
        let failure = &result.failures[0];
        assert_eq!(failure.record_index, 1);
        assert_eq!(failure.invoice_no, "PUR-002");
        assert!(failure.error.contains("500"));
        assert_eq!(failure.record, records[1]);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let submitter = ScriptedSubmitter::failing_on(&[]);
        let result = execute_batch(&submitter, &[]).await;

        assert_eq!(result.attempted, 0);
        assert_eq!(result.succeeded, 0);
        assert!(result.is_complete());
    }

    #[tokio::test]
    async fn test_all_failures_still_attempt_everything() {
        let submitter = ScriptedSubmitter::failing_on(&["PUR-001", "PUR-002"]);
        let records = vec![record("PUR-001"), record("PUR-002")];

        let result = execute_batch(&submitter, &records).await;

        assert_eq!(result.attempted, 2);
        assert_eq!(result.failed, 2);
        assert_eq!(result.failures.len(), 2);
        // Detection order is preserved
        assert_eq!(result.failures[0].invoice_no, "PUR-001");
        assert_eq!(result.failures[1].invoice_no, "PUR-002");
    }
}
