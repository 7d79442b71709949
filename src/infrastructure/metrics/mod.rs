//! Prometheus export of analysis verdicts.
//!
//! [`PrometheusResultsReporter`] owns its own registry, so several reporters
//! (one per service, or one per test) never clash on metric registration.
//! Serve [`PrometheusResultsReporter::render`] from a scrape endpoint to expose
//! the gauges.

use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use thiserror::Error;
use tracing::{debug, error};

use crate::domain::models::{Analysis, AnalysisResult, Timeframe};
use crate::domain::ports::ResultsReporter;

pub const ANALYSIS_RESULT_METRIC: &str = "keptn_analysis_result";
pub const OBJECTIVE_RESULT_METRIC: &str = "keptn_objective_result";

const ANALYSIS_LABELS: [&str; 4] = ["name", "namespace", "from", "to"];
const OBJECTIVE_LABELS: [&str; 8] = [
    "name",
    "namespace",
    "analysis_name",
    "analysis_namespace",
    "key_objective",
    "weight",
    "from",
    "to",
];

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("metric registration failed: {0}")]
    Registration(#[from] prometheus::Error),

    #[error("metrics output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Gauges holding the achieved percentage of each analysis and the value of
/// each of its objectives.
pub struct PrometheusResultsReporter {
    registry: Registry,
    analysis_result: GaugeVec,
    objective_result: GaugeVec,
}

impl PrometheusResultsReporter {
    /// Reporter with a fresh registry.
    pub fn new() -> Result<Self, MetricsError> {
        Self::with_registry(Registry::new())
    }

    /// Registers the gauges on `registry`.
    pub fn with_registry(registry: Registry) -> Result<Self, MetricsError> {
        let analysis_result = GaugeVec::new(
            Opts::new(ANALYSIS_RESULT_METRIC, "Result of Analysis"),
            &ANALYSIS_LABELS,
        )?;
        let objective_result = GaugeVec::new(
            Opts::new(OBJECTIVE_RESULT_METRIC, "Result of the Analysis Objective"),
            &OBJECTIVE_LABELS,
        )?;
        registry.register(Box::new(analysis_result.clone()))?;
        registry.register(Box::new(objective_result.clone()))?;

        Ok(Self {
            registry,
            analysis_result,
            objective_result,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Current gauges in the Prometheus text exposition format.
    pub fn render(&self) -> Result<String, MetricsError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Label values for the window bounds: fixed timestamps, or `now-<secs>s` and
/// `now` for a recent window.
fn window_labels(timeframe: &Timeframe) -> (String, String) {
    match timeframe.recent_secs {
        Some(secs) if secs > 0 => (format!("now-{secs}s"), "now".to_string()),
        _ => (
            timeframe.from.map(|t| t.to_rfc3339()).unwrap_or_default(),
            timeframe.to.map(|t| t.to_rfc3339()).unwrap_or_default(),
        ),
    }
}

impl ResultsReporter for PrometheusResultsReporter {
    fn report(&self, analysis: &Analysis, result: &AnalysisResult) {
        let (from, to) = window_labels(&analysis.timeframe);

        match self.analysis_result.get_metric_with_label_values(&[
            analysis.name.as_str(),
            analysis.namespace.as_str(),
            from.as_str(),
            to.as_str(),
        ]) {
            Ok(gauge) => gauge.set(result.achieved_percentage()),
            Err(e) => error!(error = %e, "Unable to set value for analysis result metric"),
        }

        for objective_result in &result.objective_results {
            let objective = &objective_result.objective;
            let template = &objective.analysis_value_template_ref;
            let key_objective = objective.key_objective.to_string();
            let weight = objective.weight.to_string();
            match self.objective_result.get_metric_with_label_values(&[
                template.name.as_str(),
                template.namespace.as_str(),
                analysis.name.as_str(),
                analysis.namespace.as_str(),
                key_objective.as_str(),
                weight.as_str(),
                from.as_str(),
                to.as_str(),
            ]) {
                Ok(gauge) => gauge.set(objective_result.value),
                Err(e) => error!(error = %e, "Unable to set value for objective result metric"),
            }
        }

        debug!(
            analysis = %analysis.name,
            objectives = result.objective_results.len(),
            "Analysis result exported"
        );
    }
}
