//! Objective scoring: value lookup, parsing, target evaluation and weighting.

use std::collections::HashMap;
use tracing::debug;

use crate::domain::errors::AnalysisError;
use crate::domain::models::{Objective, ObjectiveResult, ProviderResult};

use super::target::evaluate_target;

/// Scores one objective against the collected provider results.
///
/// Pass scores the full weight, warning half of it and failure nothing. A
/// missing, errored or unparsable value scores nothing and carries the error.
pub fn evaluate_objective(
    values: &HashMap<String, ProviderResult>,
    objective: &Objective,
) -> ObjectiveResult {
    let key = objective.key();
    let Some(provider_result) = values.get(&key) else {
        return ObjectiveResult::errored(
            objective,
            "",
            AnalysisError::ValueNotAvailable(key).to_string(),
        );
    };

    if let Some(err_msg) = &provider_result.err_msg {
        return ObjectiveResult::errored(objective, provider_result.query.clone(), err_msg.clone());
    }

    let value = match parse_value(&provider_result.value) {
        Ok(value) => value,
        Err(err) => {
            return ObjectiveResult::errored(
                objective,
                provider_result.query.clone(),
                err.to_string(),
            )
        }
    };

    let target_result = match evaluate_target(value, &objective.target) {
        Ok(result) => result,
        Err(err) => {
            let mut result =
                ObjectiveResult::errored(objective, provider_result.query.clone(), err.to_string());
            result.value = value;
            return result;
        }
    };

    let weight = f64::from(objective.weight);
    let score = if target_result.pass {
        weight
    } else if target_result.warning {
        weight / 2.0
    } else {
        0.0
    };

    debug!(
        objective = %key,
        value,
        score,
        pass = target_result.pass,
        warning = target_result.warning,
        "Objective evaluated"
    );

    ObjectiveResult {
        objective: objective.clone(),
        value,
        query: provider_result.query.clone(),
        score,
        result: target_result,
        error: None,
    }
}

fn parse_value(raw: &str) -> Result<f64, AnalysisError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| AnalysisError::ValueParse {
            value: raw.to_string(),
            reason: e.to_string(),
        })?;
    if !value.is_finite() {
        return Err(AnalysisError::ValueParse {
            value: raw.to_string(),
            reason: "value is not a finite number".to_string(),
        });
    }
    Ok(value)
}
