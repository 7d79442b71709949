//! Infrastructure layer module
//!
//! Adapters satisfying the domain ports, plus the ambient plumbing:
//! - Metrics backend clients (Prometheus family, dummy) and their registry
//! - Prometheus gauges exporting analysis results
//! - YAML-backed value-template store
//! - Configuration management
//! - Logging infrastructure

pub mod backends;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod templates;
