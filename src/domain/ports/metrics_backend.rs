//! Metrics backend port - the uniform fetch contract every backend client
//! implements, and the factory that resolves a client per backend type.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Analysis, BackendType, EvaluationContext, MetricsProvider};

/// Value returned by a backend for one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedValue {
    /// Numeric-parseable value
    pub value: String,
    /// Raw payload the value was extracted from
    pub raw: Vec<u8>,
}

impl FetchedValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            raw: Vec::new(),
        }
    }

    pub fn with_raw(mut self, raw: Vec<u8>) -> Self {
        self.raw = raw;
        self
    }
}

/// Trait for metrics backend clients.
///
/// Implementations must honour the context: a fetch still running when the
/// context is done should be abandoned.
#[async_trait]
pub trait MetricsBackend: Send + Sync {
    /// Backend type this client serves.
    fn backend_type(&self) -> BackendType;

    /// Execute `query` against `provider` for the analysis timeframe.
    async fn fetch_value(
        &self,
        ctx: &EvaluationContext,
        query: &str,
        analysis: &Analysis,
        provider: &MetricsProvider,
    ) -> DomainResult<FetchedValue>;
}

/// Resolves the client for a backend type.
pub trait BackendFactory: Send + Sync {
    /// Client for `backend_type`, or `BackendUnsupported`.
    fn backend_for(&self, backend_type: BackendType) -> DomainResult<Arc<dyn MetricsBackend>>;

    /// Backend types this factory can serve.
    fn supported_types(&self) -> Vec<BackendType>;
}
