//! Dispatch-side worker: resolves each objective of its shard to a templated
//! query and routes it to the matching backend queue.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{EvaluationContext, Objective, ProviderRequest, ProviderResult};
use crate::domain::ports::ValueTemplateResolver;
use crate::services::provider_pool::ProviderRouter;
use crate::services::query_template::render_query;

/// Everything one worker needs to process its shard.
pub struct Worker {
    pub id: usize,
    pub shard: Vec<Objective>,
    pub namespace: String,
    pub args: Arc<HashMap<String, String>>,
    pub resolver: Arc<dyn ValueTemplateResolver>,
    pub router: ProviderRouter,
    pub results: mpsc::Sender<ProviderResult>,
}

impl Worker {
    /// Processes the shard in order.
    ///
    /// Each objective yields either a routed request or an error result sent
    /// straight to the results channel. Stops early once the context is done,
    /// including while a template or provider lookup is still pending.
    pub async fn run(self, ctx: EvaluationContext) {
        for objective in &self.shard {
            if ctx.is_done() {
                info!(worker_id = self.id, "Worker exiting, evaluation context done");
                return;
            }

            debug!(
                worker_id = self.id,
                objective = %objective.analysis_value_template_ref,
                "Worker started job"
            );

            let resolved = tokio::select! {
                biased;
                _ = ctx.done() => {
                    info!(worker_id = self.id, "Worker exiting, evaluation context done");
                    return;
                }
                resolved = self.resolve(&ctx, objective) => resolved,
            };

            let request = match resolved {
                Ok(request) => request,
                Err(err) => {
                    warn!(
                        worker_id = self.id,
                        objective = %objective.analysis_value_template_ref,
                        error = %err,
                        "Failed to resolve objective"
                    );
                    self.report(ProviderResult::failure(
                        objective.analysis_value_template_ref.clone(),
                        "",
                        err.to_string(),
                    ))
                    .await;
                    continue;
                }
            };

            if let Err((request, err)) = self.router.route(&ctx, request).await {
                if ctx.is_done() {
                    info!(worker_id = self.id, "Worker exiting, evaluation context done");
                    return;
                }
                self.report(ProviderResult::failure(
                    request.objective,
                    request.query,
                    err.to_string(),
                ))
                .await;
            }
        }
    }

    /// Looks up the value template and its provider and renders the query.
    async fn resolve(
        &self,
        ctx: &EvaluationContext,
        objective: &Objective,
    ) -> DomainResult<ProviderRequest> {
        let template_ref = objective
            .analysis_value_template_ref
            .or_namespace(&self.namespace);
        let template = self.resolver.value_template(ctx, &template_ref).await?;

        let provider_ref = template.provider.or_namespace(&self.namespace);
        let provider = self.resolver.provider(ctx, &provider_ref).await?;

        let query = render_query(&template.query, &self.args)?;

        Ok(ProviderRequest {
            objective: objective.analysis_value_template_ref.clone(),
            query,
            provider,
        })
    }

    async fn report(&self, result: ProviderResult) {
        if self.results.send(result).await.is_err() {
            debug!(worker_id = self.id, "Result channel closed, dropping result");
        }
    }
}
