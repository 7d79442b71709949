//! Analysis service - entry point invoked once per analysis request.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::AnalysisError;
use crate::domain::models::{
    Analysis, AnalysisDefinition, AnalysisResult, EngineConfig, EvaluationContext, Objective,
    ProviderResult,
};
use crate::domain::ports::{BackendFactory, ResultsReporter, ValueTemplateResolver};
use crate::services::evaluators::evaluate_analysis;
use crate::services::worker_pool::WorkersPool;

/// Outcome of one evaluation run.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    /// Identifier used to correlate the run's log lines.
    pub run_id: Uuid,
    /// Stored values merged with the freshly collected ones, keyed by
    /// objective. Persist these to resume an incomplete run.
    pub provider_results: HashMap<String, ProviderResult>,
    /// Verdict computed from `provider_results`.
    pub result: AnalysisResult,
    /// Deadline, cancellation or last per-objective error, if any.
    pub error: Option<AnalysisError>,
}

impl AnalysisRun {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Splits a definition into objectives that still need a value and the
/// stored values that can be reused.
///
/// An objective is pending when no value is stored under its key or the
/// stored value carries an error.
pub fn pending_objectives(
    definition: &AnalysisDefinition,
    stored: &HashMap<String, ProviderResult>,
) -> (Vec<Objective>, HashMap<String, ProviderResult>) {
    let mut todo = Vec::new();
    let mut done = HashMap::new();
    for objective in &definition.objectives {
        let key = objective.key();
        match stored.get(&key) {
            Some(value) if !value.is_error() => {
                done.insert(key, value.clone());
            }
            _ => todo.push(objective.clone()),
        }
    }
    (todo, done)
}

/// Evaluates analyses against the configured metrics backends.
pub struct AnalysisService {
    resolver: Arc<dyn ValueTemplateResolver>,
    backends: Arc<dyn BackendFactory>,
    config: EngineConfig,
    reporter: Option<Arc<dyn ResultsReporter>>,
}

impl AnalysisService {
    pub fn new(
        resolver: Arc<dyn ValueTemplateResolver>,
        backends: Arc<dyn BackendFactory>,
        config: EngineConfig,
    ) -> Self {
        Self {
            resolver,
            backends,
            config,
            reporter: None,
        }
    }

    /// Exports the verdict of every complete run through `reporter`.
    pub fn with_reporter(mut self, reporter: Arc<dyn ResultsReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs one evaluation of `definition` for `analysis`.
    ///
    /// Objectives with a successful value in `stored` are not fetched again.
    /// The verdict is always computed: objectives without a value score zero
    /// and carry their error, and `AnalysisRun::error` tells the caller
    /// whether the run is complete. Only complete runs are handed to the
    /// results reporter.
    #[instrument(skip_all, fields(analysis = %analysis.name, definition = %definition.name))]
    pub async fn evaluate(
        &self,
        ctx: &EvaluationContext,
        analysis: &Analysis,
        definition: &AnalysisDefinition,
        stored: &HashMap<String, ProviderResult>,
    ) -> AnalysisRun {
        let run_id = Uuid::new_v4();
        let (todo, mut provider_results) = pending_objectives(definition, stored);
        info!(
            %run_id,
            objectives = definition.objectives.len(),
            pending = todo.len(),
            reused = provider_results.len(),
            "Starting analysis evaluation"
        );

        let mut error = None;
        if !todo.is_empty() {
            let namespace = if analysis.namespace.is_empty() {
                self.config.namespace.clone()
            } else {
                analysis.namespace.clone()
            };
            let pool = WorkersPool::new(
                self.resolver.clone(),
                self.backends.clone(),
                Arc::new(analysis.clone()),
                todo,
            )
            .with_max_workers(self.config.max_workers)
            .with_namespace(namespace)
            .with_timeout(Duration::from_secs(self.config.timeout_secs));

            let collected = pool.dispatch_and_collect(ctx).await;
            provider_results.extend(collected.values);
            error = collected.error;
        }

        let result = evaluate_analysis(&provider_results, definition);

        match &error {
            Some(err) => warn!(
                %run_id,
                error = %err,
                pass = result.pass,
                warning = result.warning,
                "Analysis evaluated with errors"
            ),
            None => info!(
                %run_id,
                pass = result.pass,
                warning = result.warning,
                "Analysis evaluated"
            ),
        }

        if error.is_none() {
            if let Some(reporter) = &self.reporter {
                reporter.report(analysis, &result);
            }
        }

        AnalysisRun {
            run_id,
            provider_results,
            result,
            error,
        }
    }
}
