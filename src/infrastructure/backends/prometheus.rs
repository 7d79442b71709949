//! Prometheus-compatible backend (Prometheus, Thanos, Cortex).
//!
//! Runs a `query_range` over the analysis timeframe with the step set to the
//! whole range, so a well-formed query yields exactly one series.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::error::BackendError;
use super::http::HttpClients;
use crate::domain::errors::DomainResult;
use crate::domain::models::{Analysis, BackendType, EvaluationContext, MetricsProvider};
use crate::domain::ports::{FetchedValue, MetricsBackend};

const QUERY_RANGE_PATH: &str = "/api/v1/query_range";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    status: String,
    #[serde(default)]
    data: Option<QueryData>,
    #[serde(default)]
    error_type: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryData {
    result_type: String,
    result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct MatrixSeries {
    /// `[timestamp, "value"]` pairs, kept as JSON so the sample can be stored
    /// as received.
    #[serde(default)]
    values: Vec<serde_json::Value>,
}

/// Client for one Prometheus-compatible backend type.
pub struct PrometheusBackend {
    backend_type: BackendType,
    clients: HttpClients,
}

impl PrometheusBackend {
    pub fn new(backend_type: BackendType, request_timeout: Duration) -> Result<Self, BackendError> {
        Ok(Self::with_clients(backend_type, HttpClients::new(request_timeout)?))
    }

    pub fn with_clients(backend_type: BackendType, clients: HttpClients) -> Self {
        Self {
            backend_type,
            clients,
        }
    }

    async fn query_range(
        &self,
        query: &str,
        analysis: &Analysis,
        provider: &MetricsProvider,
    ) -> Result<FetchedValue, BackendError> {
        let (from, to) = analysis
            .timeframe
            .resolve()
            .map_err(|e| BackendError::Timeframe(e.to_string()))?;
        let start = from.timestamp();
        let end = to.timestamp();
        let step = (end - start).max(1);
        let url = format!(
            "{}{}",
            provider.target_server.trim_end_matches('/'),
            QUERY_RANGE_PATH
        );

        info!(
            backend = %self.backend_type,
            provider = %provider.name,
            query,
            start,
            end,
            "Running range query"
        );

        let response = self
            .clients
            .for_provider(provider)
            .get(&url)
            .query(&[
                ("query", query.to_string()),
                ("start", start.to_string()),
                ("end", end.to_string()),
                ("step", step.to_string()),
            ])
            .send()
            .await
            .map_err(BackendError::from_request)?;

        let status = response.status();
        let body = response.bytes().await.map_err(BackendError::from_request)?;

        if !status.is_success() {
            // API errors come with a JSON body naming the failure
            return Err(match serde_json::from_slice::<ApiResponse>(&body) {
                Ok(ApiResponse {
                    error: Some(message),
                    error_type,
                    ..
                }) => BackendError::Query {
                    error_type: error_type.unwrap_or_default(),
                    message,
                },
                _ => BackendError::from_status(status, String::from_utf8_lossy(&body)),
            });
        }

        parse_matrix(&body)
    }
}

/// Extracts the single sample value from a `query_range` response body.
fn parse_matrix(body: &[u8]) -> Result<FetchedValue, BackendError> {
    let response: ApiResponse = serde_json::from_slice(body)?;
    if response.status != "success" {
        return Err(BackendError::Query {
            error_type: response.error_type.unwrap_or_default(),
            message: response.error.unwrap_or(response.status),
        });
    }
    if let Some(warning) = response.warnings.first() {
        info!(warning = %warning, "Prometheus API returned warnings");
    }

    let data = response
        .data
        .ok_or_else(|| BackendError::Decode("missing data".to_string()))?;
    if data.result_type != "matrix" {
        return Err(BackendError::UnexpectedResultType {
            expected: "matrix".to_string(),
            actual: data.result_type,
        });
    }

    let series: Vec<MatrixSeries> = serde_json::from_value(data.result)?;
    let sample = match series.as_slice() {
        [] => return Err(BackendError::NoValues),
        [only] => only.values.first().ok_or(BackendError::NoValues)?,
        _ => return Err(BackendError::TooManyValues),
    };

    let value = sample
        .get(1)
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| BackendError::Decode(format!("malformed sample: {sample}")))?;
    let raw = serde_json::to_vec(sample)?;
    Ok(FetchedValue::new(value).with_raw(raw))
}

#[async_trait]
impl MetricsBackend for PrometheusBackend {
    fn backend_type(&self) -> BackendType {
        self.backend_type
    }

    async fn fetch_value(
        &self,
        ctx: &EvaluationContext,
        query: &str,
        analysis: &Analysis,
        provider: &MetricsProvider,
    ) -> DomainResult<FetchedValue> {
        let fetched = tokio::select! {
            biased;
            _ = ctx.done() => Err(BackendError::Cancelled),
            fetched = self.query_range(query, analysis, provider) => fetched,
        };
        debug!(backend = %self.backend_type, ok = fetched.is_ok(), "Range query finished");
        Ok(fetched?)
    }
}
