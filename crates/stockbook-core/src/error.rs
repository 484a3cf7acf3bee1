//! Domain error types for stockbook-core.
//!
//! The calculator itself never fails (malformed numeric input is coerced to
//! zero); errors here are limited to structural misuse of an order value.

use thiserror::Error;

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An item transition referenced an index outside the order's item list.
    #[error("Item index {index} out of range (order has {len} items)")]
    ItemIndexOutOfRange { index: usize, len: usize },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
