//! Failure/warning pair evaluation.

use crate::domain::errors::{AnalysisError, DomainResult};
use crate::domain::models::{Target, TargetResult};

use super::operator::evaluate_operator;

/// Evaluates `value` against a target.
///
/// The failure comparison is checked first and short-circuits; the warning
/// comparison only runs when the failure comparison is not fulfilled. A
/// target without comparisons passes. A warning comparison without a failure
/// comparison is rejected.
pub fn evaluate_target(value: f64, target: &Target) -> DomainResult<TargetResult> {
    let failure = match (&target.failure, &target.warning) {
        (None, None) => {
            return Ok(TargetResult {
                pass: true,
                ..Default::default()
            })
        }
        (None, Some(_)) => {
            return Err(AnalysisError::InvalidTarget(
                "warning comparison set without a failure comparison".to_string(),
            ))
        }
        (Some(failure), _) => failure,
    };

    let failure_result = evaluate_operator(value, failure);
    if failure_result.fulfilled {
        return Ok(TargetResult {
            failure_result: Some(failure_result),
            warning_result: None,
            warning: false,
            pass: false,
        });
    }

    let warning_result = target
        .warning
        .as_ref()
        .map(|warning| evaluate_operator(value, warning));
    let warning = warning_result.is_some_and(|r| r.fulfilled);

    Ok(TargetResult {
        failure_result: Some(failure_result),
        warning_result,
        warning,
        pass: !warning,
    })
}
