use thiserror::Error;

use crate::domain::errors::AnalysisError;

/// Errors that can occur when querying a metrics backend
#[derive(Error, Debug)]
pub enum BackendError {
    /// Backend answered with a non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Backend rejected the query itself
    #[error("query failed ({error_type}): {message}")]
    Query { error_type: String, message: String },

    /// Network error occurred during request
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("could not decode response: {0}")]
    Decode(String),

    /// Response did not have the expected shape
    #[error("could not cast result: expected {expected}, got {actual}")]
    UnexpectedResultType { expected: String, actual: String },

    #[error("no values in query result")]
    NoValues,

    #[error("too many values in query result")]
    TooManyValues,

    #[error("request timed out")]
    Timeout,

    #[error("request cancelled")]
    Cancelled,

    /// Analysis timeframe cannot be turned into query bounds
    #[error("invalid timeframe: {0}")]
    Timeframe(String),

    /// HTTP client could not be built
    #[error("invalid client configuration: {0}")]
    Configuration(String),
}

impl BackendError {
    /// Returns true if the same query may succeed when retried later
    pub fn is_transient(&self) -> bool {
        match self {
            BackendError::Status { status, .. } => {
                status.is_server_error() || status.as_u16() == 429
            }
            BackendError::Network(_) | BackendError::Timeout => true,
            _ => false,
        }
    }

    /// Create error from HTTP status code and response body
    pub fn from_status(status: reqwest::StatusCode, body: impl Into<String>) -> Self {
        BackendError::Status {
            status,
            body: body.into().trim().to_string(),
        }
    }

    /// Classify a reqwest error, separating timeouts from other failures
    pub fn from_request(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout
        } else {
            BackendError::Network(err)
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Decode(err.to_string())
    }
}

impl From<BackendError> for AnalysisError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Cancelled => AnalysisError::Cancelled,
            other => AnalysisError::Backend(other.to_string()),
        }
    }
}
