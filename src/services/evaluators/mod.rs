//! Scoring cascade: comparison, target, objective and analysis evaluation.
//!
//! All evaluators are pure functions over the collected provider results.

pub mod analysis;
pub mod objective;
pub mod operator;
pub mod target;

pub use analysis::evaluate_analysis;
pub use objective::evaluate_objective;
pub use operator::{evaluate_operator, is_fulfilled};
pub use target::evaluate_target;
