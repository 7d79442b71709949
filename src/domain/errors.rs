//! Domain errors for the analysis engine.

use thiserror::Error;

/// Errors raised while resolving, fetching, collecting or scoring objectives.
///
/// Values are cloneable so they can travel through channels and be recorded
/// as the cancellation cause of an evaluation context.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalysisError {
    #[error("value template not found: {0}")]
    TemplateNotFound(String),

    #[error("metrics provider not found: {0}")]
    ProviderNotFound(String),

    #[error("could not template the query: {0}")]
    QueryTemplate(String),

    #[error("required value '{0}' not available")]
    ValueNotAvailable(String),

    #[error("could not parse value '{value}': {reason}")]
    ValueParse { value: String, reason: String },

    #[error("invalid timeframe: {0}")]
    InvalidTimeframe(String),

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("provider {0} not supported")]
    BackendUnsupported(String),

    #[error("backend request failed: {0}")]
    Backend(String),

    #[error("objective {key} failed: {message}")]
    ObjectiveFailed { key: String, message: String },

    #[error("collection terminated: deadline exceeded")]
    DeadlineExceeded,

    #[error("collection terminated: context cancelled")]
    Cancelled,

    #[error("result channel closed after {received} of {expected} results")]
    ChannelClosed { received: usize, expected: usize },
}

impl AnalysisError {
    /// True for errors that end the whole run rather than one objective.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AnalysisError::BackendUnsupported(_)
                | AnalysisError::DeadlineExceeded
                | AnalysisError::Cancelled
                | AnalysisError::ChannelClosed { .. }
        )
    }
}

pub type DomainResult<T> = Result<T, AnalysisError>;
