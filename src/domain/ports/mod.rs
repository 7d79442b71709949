//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that infrastructure adapters must implement:
//! - MetricsBackend: fetch one value for a query from a metrics system
//! - BackendFactory: resolve the client serving a backend type
//! - ValueTemplateResolver: look up value templates and metrics providers
//! - ResultsReporter: publish the verdict of completed analyses

pub mod metrics_backend;
pub mod results_reporter;
pub mod template_resolver;

pub use metrics_backend::{BackendFactory, FetchedValue, MetricsBackend};
pub use results_reporter::ResultsReporter;
pub use template_resolver::ValueTemplateResolver;
