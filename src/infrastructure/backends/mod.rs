//! Metrics backend clients and the registry resolving them per backend type.

pub mod dummy;
pub mod error;
pub mod http;
pub mod prometheus;

pub use dummy::DummyBackend;
pub use error::BackendError;
pub use http::HttpClients;
pub use prometheus::PrometheusBackend;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::domain::errors::{AnalysisError, DomainResult};
use crate::domain::models::BackendType;
use crate::domain::models::config::BackendsConfig;
use crate::domain::ports::{BackendFactory, MetricsBackend};

/// Explicit map from backend type to client.
///
/// Types without a registered client resolve to `BackendUnsupported`.
#[derive(Default, Clone)]
pub struct BackendRegistry {
    backends: HashMap<BackendType, Arc<dyn MetricsBackend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry serving the Prometheus family and the dummy backend.
    pub fn with_defaults(config: &BackendsConfig) -> Result<Self, BackendError> {
        let clients = HttpClients::new(Duration::from_secs(config.request_timeout_secs))?;
        let mut registry = Self::new();
        for backend_type in [BackendType::Prometheus, BackendType::Thanos, BackendType::Cortex] {
            registry.register(
                backend_type,
                Arc::new(PrometheusBackend::with_clients(backend_type, clients.clone())),
            );
        }
        registry.register(
            BackendType::Dummy,
            Arc::new(DummyBackend::with_clients(clients)),
        );
        Ok(registry)
    }

    /// Registers `backend` for `backend_type`, replacing any previous client.
    pub fn register(&mut self, backend_type: BackendType, backend: Arc<dyn MetricsBackend>) {
        debug!(backend = %backend_type, "Registering metrics backend");
        self.backends.insert(backend_type, backend);
    }

    pub fn with_backend(mut self, backend_type: BackendType, backend: Arc<dyn MetricsBackend>) -> Self {
        self.register(backend_type, backend);
        self
    }
}

impl BackendFactory for BackendRegistry {
    fn backend_for(&self, backend_type: BackendType) -> DomainResult<Arc<dyn MetricsBackend>> {
        self.backends
            .get(&backend_type)
            .cloned()
            .ok_or_else(|| AnalysisError::BackendUnsupported(backend_type.to_string()))
    }

    fn supported_types(&self) -> Vec<BackendType> {
        BackendType::ALL
            .into_iter()
            .filter(|t| self.backends.contains_key(t))
            .collect()
    }
}
