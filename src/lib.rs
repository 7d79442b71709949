//! SLO Analyzer - concurrent evaluation of service-level objectives
//!
//! An analysis definition lists weighted objectives, each pointing at a value
//! template (a query bound to a metrics provider) and carrying pass/warn
//! targets. One evaluation fetches every objective's value concurrently under
//! a fixed deadline and scores the results into a pass / warning / fail
//! verdict.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Analysis model, errors and ports
//! - **Service Layer** (`services`): Worker pool, provider dispatch and scoring
//! - **Infrastructure Layer** (`infrastructure`): Backend clients, template
//!   store, configuration and logging
//!
//! # Example
//!
//! ```ignore
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use slo_analyzer::{
//!     AnalysisService, BackendRegistry, ConfigLoader, EvaluationContext, InMemoryTemplateStore,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let store = InMemoryTemplateStore::load_from_file("templates.yaml")?;
//!     let backends = BackendRegistry::with_defaults(&config.backends)?;
//!     let service = AnalysisService::new(Arc::new(store), Arc::new(backends), config.engine);
//!
//!     let run = service
//!         .evaluate(&EvaluationContext::new(), &analysis, &definition, &HashMap::new())
//!         .await;
//!     println!("{}", run.result.to_json()?);
//!     Ok(())
//! }
//! ```

pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Analysis, AnalysisDefinition, AnalysisResult, BackendType, Config, EvaluationContext,
    MetricsProvider, ObjectReference, Objective, ObjectiveResult, Operator, ProviderResult,
    Target, Timeframe, TotalScore, ValueTemplate,
};
pub use domain::ports::{
    BackendFactory, FetchedValue, MetricsBackend, ResultsReporter, ValueTemplateResolver,
};
pub use domain::{AnalysisError, DomainResult};
pub use infrastructure::backends::{BackendError, BackendRegistry};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::logging::{LogConfig, LoggerImpl};
pub use infrastructure::metrics::PrometheusResultsReporter;
pub use infrastructure::templates::InMemoryTemplateStore;
pub use services::{AnalysisRun, AnalysisService, WorkersPool};
