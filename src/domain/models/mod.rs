pub mod analysis;
pub mod config;
pub mod context;
pub mod objective;
pub mod provider;
pub mod result;

pub use analysis::{Analysis, Timeframe};
pub use config::{BackendsConfig, Config, EngineConfig, LoggingConfig};
pub use context::EvaluationContext;
pub use objective::{
    AnalysisDefinition, ObjectReference, Objective, Operator, OperatorValue, RangeValue, Target,
    TotalScore,
};
pub use provider::{BackendType, MetricsProvider, ProviderRequest, ProviderResult, ValueTemplate};
pub use result::{AnalysisResult, ObjectiveResult, OperatorResult, TargetResult};
