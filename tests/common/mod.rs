//! Common test utilities for integration tests
//!
//! Mock backends, a lookup-recording backend factory and fixture builders
//! shared by the integration test files.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use slo_analyzer::domain::models::{BackendType, MetricsProvider, ObjectReference, ValueTemplate};
use slo_analyzer::{
    Analysis, AnalysisDefinition, AnalysisError, BackendFactory, BackendRegistry, DomainResult,
    EvaluationContext, FetchedValue, InMemoryTemplateStore, MetricsBackend, Objective, Target,
    TotalScore,
};

pub const NAMESPACE: &str = "default";

/// Setup test logging
///
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Backend answering from a fixed query → value table.
///
/// Unknown queries fail with a backend error. An optional delay is applied
/// before every answer; queries listed in `hang` never answer.
pub struct MockBackend {
    backend_type: BackendType,
    values: HashMap<String, Result<String, String>>,
    delay: Option<Duration>,
    hang: Vec<String>,
    calls: AtomicUsize,
}

impl MockBackend {
    pub fn new(backend_type: BackendType) -> Self {
        Self {
            backend_type,
            values: HashMap::new(),
            delay: None,
            hang: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_value(mut self, query: &str, value: &str) -> Self {
        self.values.insert(query.to_string(), Ok(value.to_string()));
        self
    }

    pub fn with_error(mut self, query: &str, message: &str) -> Self {
        self.values.insert(query.to_string(), Err(message.to_string()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn hanging_on(mut self, query: &str) -> Self {
        self.hang.push(query.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetricsBackend for MockBackend {
    fn backend_type(&self) -> BackendType {
        self.backend_type
    }

    async fn fetch_value(
        &self,
        _ctx: &EvaluationContext,
        query: &str,
        _analysis: &Analysis,
        _provider: &MetricsProvider,
    ) -> DomainResult<FetchedValue> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.hang.iter().any(|q| q == query) {
            std::future::pending::<()>().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.values.get(query) {
            Some(Ok(value)) => Ok(FetchedValue::new(value.clone())),
            Some(Err(message)) => Err(AnalysisError::Backend(message.clone())),
            None => Err(AnalysisError::Backend(format!("unknown query {query}"))),
        }
    }
}

/// Factory wrapper recording every backend lookup.
pub struct RecordingFactory {
    inner: BackendRegistry,
    lookups: Mutex<Vec<BackendType>>,
}

impl RecordingFactory {
    pub fn new(inner: BackendRegistry) -> Self {
        Self {
            inner,
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn lookups(&self) -> Vec<BackendType> {
        self.lookups.lock().unwrap().clone()
    }
}

impl BackendFactory for RecordingFactory {
    fn backend_for(&self, backend_type: BackendType) -> DomainResult<Arc<dyn MetricsBackend>> {
        self.lookups.lock().unwrap().push(backend_type);
        self.inner.backend_for(backend_type)
    }

    fn supported_types(&self) -> Vec<BackendType> {
        self.inner.supported_types()
    }
}

pub fn provider(name: &str, backend_type: BackendType) -> MetricsProvider {
    let mut provider = MetricsProvider::new(name, backend_type, format!("http://{name}:9090"));
    provider.namespace = NAMESPACE.to_string();
    provider
}

pub fn template(name: &str, provider: &str, query: &str) -> ValueTemplate {
    ValueTemplate {
        name: name.to_string(),
        namespace: NAMESPACE.to_string(),
        provider: ObjectReference::new(provider),
        query: query.to_string(),
    }
}

/// Store with one provider per given backend type, named after the type.
pub fn store_with_providers(types: &[BackendType]) -> InMemoryTemplateStore {
    types.iter().fold(InMemoryTemplateStore::new(), |store, t| {
        store.with_provider(provider(t.as_str(), *t))
    })
}

pub fn objective(name: &str, target: Target, weight: u32) -> Objective {
    Objective::new(ObjectReference::new(name), target).with_weight(weight)
}

pub fn definition(objectives: Vec<Objective>, pass: f64, warning: f64) -> AnalysisDefinition {
    AnalysisDefinition {
        name: "definition".to_string(),
        namespace: NAMESPACE.to_string(),
        objectives,
        total_score: TotalScore {
            pass_percentage: pass,
            warning_percentage: warning,
        },
    }
}

pub fn analysis() -> Analysis {
    Analysis::new("analysis", ObjectReference::new("definition"))
}
