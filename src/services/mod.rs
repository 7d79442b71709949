//! Services layer: the evaluation engine.
//!
//! Dispatch side (task assigner, workers, provider dispatch pool) and
//! evaluation side (operator → target → objective → analysis scoring) meet
//! in [`AnalysisService`].

pub mod analysis_service;
pub mod evaluators;
pub mod provider_pool;
pub mod query_template;
pub mod task_assigner;
pub mod worker;
pub mod worker_pool;

pub use analysis_service::{AnalysisRun, AnalysisService, pending_objectives};
pub use evaluators::{evaluate_analysis, evaluate_objective, evaluate_operator, evaluate_target};
pub use provider_pool::{ProviderDispatchPool, ProviderRouter};
pub use query_template::render_query;
pub use task_assigner::TaskAssigner;
pub use worker::Worker;
pub use worker_pool::{CollectedResults, DEFAULT_COLLECTION_TIMEOUT, WorkersPool, collect_results};
