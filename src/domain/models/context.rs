//! Deadline-bound cancellation context threaded through one evaluation run.

use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::domain::errors::AnalysisError;

/// Cancellable handle with an optional fixed expiry.
///
/// Clones share the same token, deadline and cancellation cause. Children
/// created with [`EvaluationContext::child_with_timeout`] are cancelled with
/// their parent but can be cancelled on their own without affecting it. A
/// child cancelled through its parent reports the parent's cause.
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    token: CancellationToken,
    deadline: Option<Instant>,
    cause: Arc<OnceLock<AnalysisError>>,
    parent: Option<Arc<EvaluationContext>>,
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationContext {
    /// Context without a deadline.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
            cause: Arc::new(OnceLock::new()),
            parent: None,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            ..Self::new()
        }
    }

    /// Derives a child whose deadline is the earlier of the parent's and
    /// `now + timeout`.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let own = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(parent) if parent < own => parent,
            _ => own,
        };
        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
            cause: Arc::new(OnceLock::new()),
            parent: Some(Arc::new(self.clone())),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; `None` without a deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Cancels the context and records why. The first recorded cause wins.
    pub fn cancel_with(&self, cause: AnalysisError) {
        let _ = self.cause.set(cause);
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// True once cancelled or past the deadline.
    pub fn is_done(&self) -> bool {
        self.is_cancelled() || self.is_expired()
    }

    /// Resolves when the context is cancelled or its deadline passes.
    pub async fn done(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.token.cancelled() => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => self.token.cancelled().await,
        }
    }

    /// Why the context is done, or `None` while it is still live.
    pub fn error(&self) -> Option<AnalysisError> {
        if let Some(cause) = self.cause.get() {
            return Some(cause.clone());
        }
        if self.is_cancelled() {
            if let Some(parent) = self.parent.as_ref().filter(|p| p.is_cancelled()) {
                return parent.error();
            }
            if self.is_expired() {
                return Some(AnalysisError::DeadlineExceeded);
            }
            return Some(AnalysisError::Cancelled);
        }
        if self.is_expired() {
            return Some(AnalysisError::DeadlineExceeded);
        }
        None
    }
}
