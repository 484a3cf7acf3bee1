//! Error types for the REST collaborator clients.

use thiserror::Error;

/// Result type alias for collaborator calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failures talking to the back-office REST collaborators.
///
/// A submission failure is per-record: the batch executor records it and
/// moves on, it never aborts the batch.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request could not be sent or the connection dropped.
    #[error("Network error: {0}")]
    Network(String),

    /// The collaborator answered with a non-success status.
    #[error("Endpoint returned {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The response body could not be decoded into the expected shape.
    #[error("Invalid response payload: {0}")]
    InvalidResponse(String),

    /// The order could not be serialized into the wire payload.
    #[error("Payload encoding failed: {0}")]
    Encode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = ApiError::Status {
            status: 500,
            detail: "duplicate invoice".to_string(),
        };
        assert_eq!(err.to_string(), "Endpoint returned 500: duplicate invoice");
    }
}
