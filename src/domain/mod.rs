//! Domain layer for the analysis engine
//!
//! This module contains the analysis data model, the error taxonomy and the
//! ports the engine depends on.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{AnalysisError, DomainResult};
