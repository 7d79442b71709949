//! Dummy backend: sends the query to the target server and returns the
//! response body as the value. Useful for demos and tests.

use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

use super::error::BackendError;
use super::http::HttpClients;
use crate::domain::errors::DomainResult;
use crate::domain::models::{Analysis, BackendType, EvaluationContext, MetricsProvider};
use crate::domain::ports::{FetchedValue, MetricsBackend};

pub struct DummyBackend {
    clients: HttpClients,
}

impl DummyBackend {
    pub fn new(request_timeout: Duration) -> Result<Self, BackendError> {
        Ok(Self::with_clients(HttpClients::new(request_timeout)?))
    }

    pub fn with_clients(clients: HttpClients) -> Self {
        Self { clients }
    }

    async fn get(&self, query: &str, provider: &MetricsProvider) -> Result<FetchedValue, BackendError> {
        info!(provider = %provider.name, query, "Running dummy query");

        let response = self
            .clients
            .for_provider(provider)
            .get(&provider.target_server)
            .query(&[("query", query)])
            .send()
            .await
            .map_err(BackendError::from_request)?;

        let status = response.status();
        let body = response.bytes().await.map_err(BackendError::from_request)?;
        let text = String::from_utf8_lossy(&body);
        if !status.is_success() {
            return Err(BackendError::from_status(status, text));
        }

        Ok(FetchedValue::new(text.trim()).with_raw(body.to_vec()))
    }
}

#[async_trait]
impl MetricsBackend for DummyBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Dummy
    }

    async fn fetch_value(
        &self,
        ctx: &EvaluationContext,
        query: &str,
        _analysis: &Analysis,
        provider: &MetricsProvider,
    ) -> DomainResult<FetchedValue> {
        let fetched = tokio::select! {
            biased;
            _ = ctx.done() => Err(BackendError::Cancelled),
            fetched = self.get(query, provider) => fetched,
        };
        Ok(fetched?)
    }
}
