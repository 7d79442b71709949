//! Export port for finished analyses.

use crate::domain::models::{Analysis, AnalysisResult};

/// Publishes the verdict of each completed analysis.
///
/// Implementations are owned by whoever builds the service and are shared
/// across runs, so `report` takes `&self` and must be safe to call
/// concurrently.
pub trait ResultsReporter: Send + Sync {
    fn report(&self, analysis: &Analysis, result: &AnalysisResult);
}
