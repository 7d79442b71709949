//! Provider dispatch pool: one bounded request queue and one consumer task per
//! backend type.

use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::domain::errors::AnalysisError;
use crate::domain::models::{
    Analysis, BackendType, EvaluationContext, ProviderRequest, ProviderResult,
};
use crate::domain::ports::{BackendFactory, MetricsBackend};

/// Cloneable handle workers use to route requests to backend queues.
#[derive(Clone)]
pub struct ProviderRouter {
    queues: Arc<HashMap<BackendType, mpsc::Sender<ProviderRequest>>>,
}

impl ProviderRouter {
    /// Enqueues `request` on the queue of its provider's backend type.
    ///
    /// Gives up when the context is done; the request is then returned in
    /// the error so the caller can report it.
    pub async fn route(
        &self,
        ctx: &EvaluationContext,
        request: ProviderRequest,
    ) -> Result<(), (ProviderRequest, AnalysisError)> {
        let backend_type = request.provider.backend_type;
        let Some(queue) = self.queues.get(&backend_type) else {
            return Err((
                request,
                AnalysisError::BackendUnsupported(backend_type.to_string()),
            ));
        };

        tokio::select! {
            biased;
            _ = ctx.done() => {
                let err = ctx.error().unwrap_or(AnalysisError::Cancelled);
                Err((request, err))
            }
            permit = queue.reserve() => match permit {
                Ok(permit) => {
                    permit.send(request);
                    Ok(())
                }
                Err(_) => Err((
                    request,
                    AnalysisError::BackendUnsupported(backend_type.to_string()),
                )),
            },
        }
    }
}

/// Owns the per-backend queues and their consumer tasks for one run.
pub struct ProviderDispatchPool {
    queues: Arc<HashMap<BackendType, mpsc::Sender<ProviderRequest>>>,
    consumers: Vec<JoinHandle<()>>,
}

impl ProviderDispatchPool {
    /// Opens one queue of `capacity` per backend type and spawns its consumer.
    ///
    /// Consumers resolve their backend client lazily on the first request, so
    /// types no objective routes to never consult the factory.
    pub fn start(
        ctx: &EvaluationContext,
        factory: Arc<dyn BackendFactory>,
        analysis: Arc<Analysis>,
        results: mpsc::Sender<ProviderResult>,
        capacity: usize,
    ) -> Self {
        let capacity = capacity.max(1);
        let mut queues = HashMap::with_capacity(BackendType::ALL.len());
        let mut consumers = Vec::with_capacity(BackendType::ALL.len());

        for backend_type in BackendType::ALL {
            let (tx, rx) = mpsc::channel(capacity);
            queues.insert(backend_type, tx);

            let consumer = BackendConsumer {
                backend_type,
                ctx: ctx.clone(),
                factory: factory.clone(),
                analysis: analysis.clone(),
                results: results.clone(),
            };
            consumers.push(tokio::spawn(consumer.run(rx)));
        }

        Self {
            queues: Arc::new(queues),
            consumers,
        }
    }

    pub fn router(&self) -> ProviderRouter {
        ProviderRouter {
            queues: self.queues.clone(),
        }
    }

    /// Closes every queue and waits for the consumers to drain and exit.
    ///
    /// Consumers only see their queue closed once every router handed out
    /// has been dropped as well.
    pub async fn stop(self) {
        drop(self.queues);
        for joined in join_all(self.consumers).await {
            if let Err(e) = joined {
                error!(error = %e, "Backend consumer task failed");
            }
        }
    }
}

/// Consumer draining one backend type's queue.
struct BackendConsumer {
    backend_type: BackendType,
    ctx: EvaluationContext,
    factory: Arc<dyn BackendFactory>,
    analysis: Arc<Analysis>,
    results: mpsc::Sender<ProviderResult>,
}

impl BackendConsumer {
    async fn run(self, mut queue: mpsc::Receiver<ProviderRequest>) {
        let mut backend: Option<Arc<dyn MetricsBackend>> = None;

        while let Some(request) = queue.recv().await {
            let client = match &backend {
                Some(client) => client.clone(),
                None => match self.factory.backend_for(self.backend_type) {
                    Ok(client) => {
                        backend = Some(client.clone());
                        client
                    }
                    Err(err) => {
                        error!(
                            backend = %self.backend_type,
                            objective = %request.objective,
                            error = %err,
                            "No client for backend type, cancelling run"
                        );
                        self.send(ProviderResult::failure(
                            request.objective,
                            request.query,
                            err.to_string(),
                        ))
                        .await;
                        self.ctx.cancel_with(err);
                        return;
                    }
                },
            };

            let result = self.fetch(client.as_ref(), request).await;
            self.send(result).await;
        }

        debug!(backend = %self.backend_type, "Backend queue closed, consumer exiting");
    }

    async fn fetch(&self, client: &dyn MetricsBackend, request: ProviderRequest) -> ProviderResult {
        debug!(
            backend = %self.backend_type,
            objective = %request.objective,
            query = %request.query,
            "Fetching value"
        );

        let fetched = tokio::select! {
            biased;
            _ = self.ctx.done() => Err(self.ctx.error().unwrap_or(AnalysisError::Cancelled)),
            fetched = client.fetch_value(&self.ctx, &request.query, &self.analysis, &request.provider) => fetched,
        };

        match fetched {
            Ok(value) => ProviderResult::success(request.objective, value.value, request.query),
            Err(err) => {
                warn!(
                    backend = %self.backend_type,
                    objective = %request.objective,
                    error = %err,
                    "Failed to fetch value"
                );
                ProviderResult::failure(request.objective, request.query, err.to_string())
            }
        }
    }

    async fn send(&self, result: ProviderResult) {
        if self.results.send(result).await.is_err() {
            debug!(backend = %self.backend_type, "Result channel closed, dropping result");
        }
    }
}
