//! Worker pool orchestrator and result aggregator.
//!
//! One call to [`WorkersPool::dispatch_and_collect`] runs a full fan-out/fan-in
//! cycle under a deadline:
//! - the objectives are split into shards, one per worker
//! - the provider dispatch pool opens one queue and consumer per backend type
//! - workers resolve queries and route them; consumers fetch the values
//! - the aggregator reads one result per objective from the shared channel

use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::domain::errors::AnalysisError;
use crate::domain::models::{Analysis, EvaluationContext, Objective, ProviderResult};
use crate::domain::ports::{BackendFactory, ValueTemplateResolver};
use crate::services::provider_pool::ProviderDispatchPool;
use crate::services::task_assigner::TaskAssigner;
use crate::services::worker::Worker;

/// Default deadline for collecting all values of one run.
pub const DEFAULT_COLLECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Results gathered by one collection, complete or partial.
///
/// `values` is keyed by objective key and always holds every result that
/// arrived, including error-bearing ones. `error` is the deadline or
/// cancellation error when collection stopped early, otherwise the last
/// per-objective error seen.
#[derive(Debug, Clone, Default)]
pub struct CollectedResults {
    pub values: HashMap<String, ProviderResult>,
    pub error: Option<AnalysisError>,
}

impl CollectedResults {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<HashMap<String, ProviderResult>, AnalysisError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.values),
        }
    }
}

/// Concurrent evaluator for one set of objectives.
pub struct WorkersPool {
    resolver: Arc<dyn ValueTemplateResolver>,
    factory: Arc<dyn BackendFactory>,
    analysis: Arc<Analysis>,
    objectives: Vec<Objective>,
    max_workers: usize,
    namespace: String,
    timeout: Duration,
}

impl WorkersPool {
    pub fn new(
        resolver: Arc<dyn ValueTemplateResolver>,
        factory: Arc<dyn BackendFactory>,
        analysis: Arc<Analysis>,
        objectives: Vec<Objective>,
    ) -> Self {
        Self {
            resolver,
            factory,
            analysis,
            objectives,
            max_workers: 1,
            namespace: "default".to_string(),
            timeout: DEFAULT_COLLECTION_TIMEOUT,
        }
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn num_jobs(&self) -> usize {
        self.objectives.len()
    }

    /// Resolves, fetches and collects one value per objective.
    ///
    /// Runs under a child of `ctx` bounded by the pool timeout. Never fails
    /// fast: per-objective errors are stored at their key and the last one is
    /// reported in [`CollectedResults::error`]. When the deadline passes or the
    /// run is cancelled, whatever arrived so far is returned with that error.
    pub async fn dispatch_and_collect(&self, ctx: &EvaluationContext) -> CollectedResults {
        let num_jobs = self.objectives.len();
        let assigner = TaskAssigner::new(&self.objectives, self.max_workers);
        let num_workers = assigner.effective_workers();
        if num_workers == 0 {
            debug!("No objectives to dispatch");
            return CollectedResults::default();
        }

        info!(
            analysis = %self.analysis.name,
            num_jobs,
            num_workers,
            timeout_ms = self.timeout.as_millis() as u64,
            "Dispatching objectives"
        );

        let run_ctx = ctx.child_with_timeout(self.timeout);
        let (results_tx, mut results_rx) = mpsc::channel(num_jobs);

        let pool = ProviderDispatchPool::start(
            &run_ctx,
            self.factory.clone(),
            self.analysis.clone(),
            results_tx.clone(),
            num_jobs,
        );

        let args = Arc::new(self.analysis.args.clone());
        let workers: Vec<_> = assigner
            .assign_tasks()
            .into_iter()
            .map(|(id, shard)| {
                let worker = Worker {
                    id,
                    shard: shard.to_vec(),
                    namespace: self.namespace.clone(),
                    args: args.clone(),
                    resolver: self.resolver.clone(),
                    router: pool.router(),
                    results: results_tx.clone(),
                };
                tokio::spawn(worker.run(run_ctx.clone()))
            })
            .collect();
        drop(results_tx);

        let collected = collect_results(&run_ctx, &mut results_rx, num_jobs).await;

        // Release workers and consumers still blocked on this run.
        run_ctx.cancel();
        for joined in join_all(workers).await {
            if let Err(e) = joined {
                error!(error = %e, "Worker task failed");
            }
        }
        pool.stop().await;

        match &collected.error {
            Some(err) => warn!(
                analysis = %self.analysis.name,
                collected = collected.values.len(),
                num_jobs,
                error = %err,
                "Collection finished with errors"
            ),
            None => info!(
                analysis = %self.analysis.name,
                collected = collected.values.len(),
                "Collection finished"
            ),
        }

        collected
    }
}

/// Reads `num_jobs` results from `results`, keyed by objective.
///
/// Returns early with the partial map and the context error once `ctx` is
/// done. Error-bearing results are stored like any other; the last one is
/// kept as the reported error.
pub async fn collect_results(
    ctx: &EvaluationContext,
    results: &mut mpsc::Receiver<ProviderResult>,
    num_jobs: usize,
) -> CollectedResults {
    let mut collected = CollectedResults {
        values: HashMap::with_capacity(num_jobs),
        error: None,
    };

    for received in 0..num_jobs {
        tokio::select! {
            biased;
            _ = ctx.done() => {
                collected.error = Some(ctx.error().unwrap_or(AnalysisError::Cancelled));
                return collected;
            }
            next = results.recv() => match next {
                Some(result) => {
                    let key = result.key();
                    if let Some(message) = &result.err_msg {
                        collected.error = Some(AnalysisError::ObjectiveFailed {
                            key: key.clone(),
                            message: message.clone(),
                        });
                    }
                    collected.values.insert(key, result);
                }
                None => {
                    collected.error = Some(AnalysisError::ChannelClosed {
                        received,
                        expected: num_jobs,
                    });
                    return collected;
                }
            }
        }
    }

    collected
}
