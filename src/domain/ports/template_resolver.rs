//! Value-template resolution port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{EvaluationContext, MetricsProvider, ObjectReference, ValueTemplate};

/// Looks up value templates and the providers they query.
///
/// References passed in always carry a namespace; callers default empty
/// namespaces before resolving. Missing resources are reported as
/// `TemplateNotFound` / `ProviderNotFound`.
#[async_trait]
pub trait ValueTemplateResolver: Send + Sync {
    async fn value_template(
        &self,
        ctx: &EvaluationContext,
        reference: &ObjectReference,
    ) -> DomainResult<ValueTemplate>;

    async fn provider(
        &self,
        ctx: &EvaluationContext,
        reference: &ObjectReference,
    ) -> DomainResult<MetricsProvider>;
}
