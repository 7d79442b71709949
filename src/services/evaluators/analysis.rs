//! Analysis scoring: weighted aggregation and the key-objective override.

use std::collections::HashMap;
use tracing::{debug, info};

use crate::domain::models::{AnalysisDefinition, AnalysisResult, ProviderResult};

use super::objective::evaluate_objective;

/// Scores every objective of `definition` and derives the verdict.
///
/// The achieved percentage is compared against the pass threshold, then the
/// warning threshold. A failed key objective forces both `pass` and `warning`
/// to false whatever the percentage.
pub fn evaluate_analysis(
    values: &HashMap<String, ProviderResult>,
    definition: &AnalysisDefinition,
) -> AnalysisResult {
    let mut result = AnalysisResult {
        objective_results: Vec::with_capacity(definition.objectives.len()),
        ..Default::default()
    };
    let mut key_objective_failed = false;

    for objective in &definition.objectives {
        let objective_result = evaluate_objective(values, objective);
        result.maximum_score += f64::from(objective.weight);
        result.total_score += objective_result.score;
        if objective.key_objective && objective_result.is_failed() {
            debug!(objective = %objective.key(), "Key objective failed");
            key_objective_failed = true;
        }
        result.objective_results.push(objective_result);
    }

    let achieved = result.achieved_percentage();
    let thresholds = definition.total_score;
    if achieved >= thresholds.pass_percentage {
        result.pass = true;
    } else if achieved >= thresholds.warning_percentage {
        result.warning = true;
    }

    if key_objective_failed {
        result.pass = false;
        result.warning = false;
    }

    info!(
        definition = %definition.name,
        total_score = result.total_score,
        maximum_score = result.maximum_score,
        achieved_percentage = achieved,
        pass = result.pass,
        warning = result.warning,
        "Analysis scored"
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ObjectReference, Objective, Operator, Target, TotalScore};

    fn definition(objectives: Vec<Objective>, pass: f64, warning: f64) -> AnalysisDefinition {
        AnalysisDefinition {
            name: "definition".to_string(),
            namespace: "default".to_string(),
            objectives,
            total_score: TotalScore {
                pass_percentage: pass,
                warning_percentage: warning,
            },
        }
    }

    /// Objective failing below 15 and warning below 20.
    fn objective(name: &str, weight: u32) -> Objective {
        Objective::new(
            ObjectReference::new(name),
            Target::failing_when(Operator::less_than(15.0)).with_warning(Operator::less_than(20.0)),
        )
        .with_weight(weight)
    }

    fn values(entries: &[(&str, &str)]) -> HashMap<String, ProviderResult> {
        entries
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    ProviderResult::success(ObjectReference::new(*name), *value, "q"),
                )
            })
            .collect()
    }

    #[test]
    fn test_no_objectives() {
        let result = evaluate_analysis(&HashMap::new(), &definition(vec![], 0.0, 0.0));
        assert_eq!(result.total_score, 0.0);
        assert_eq!(result.maximum_score, 0.0);
        assert!(result.pass);
        assert!(!result.warning);
        assert!(result.objective_results.is_empty());
    }

    #[test]
    fn test_two_passing_objectives() {
        let def = definition(vec![objective("a", 10), objective("b", 10)], 80.0, 50.0);
        let result = evaluate_analysis(&values(&[("a", "30"), ("b", "40")]), &def);
        assert_eq!(result.total_score, 20.0);
        assert_eq!(result.maximum_score, 20.0);
        assert!(result.pass);
        assert!(!result.warning);
    }

    #[test]
    fn test_warning_scenario() {
        let def = definition(vec![objective("a", 10)], 80.0, 50.0);
        let result = evaluate_analysis(&values(&[("a", "17")]), &def);
        assert_eq!(result.total_score, 5.0);
        assert!(!result.pass);
        assert!(result.warning);
    }

    #[test]
    fn test_fail_scenario() {
        let def = definition(vec![objective("a", 10)], 80.0, 50.0);
        let result = evaluate_analysis(&values(&[("a", "10")]), &def);
        assert_eq!(result.total_score, 0.0);
        assert!(!result.pass);
        assert!(!result.warning);
    }

    #[test]
    fn test_failed_key_objective_overrides_passing_percentage() {
        let def = definition(
            vec![
                objective("a", 1).as_key_objective(),
                objective("b", 10),
                objective("c", 10),
            ],
            80.0,
            50.0,
        );
        let result = evaluate_analysis(&values(&[("a", "1"), ("b", "30"), ("c", "30")]), &def);
        assert!(result.achieved_percentage() >= 80.0);
        assert!(!result.pass);
        assert!(!result.warning);
    }

    #[test]
    fn test_single_failed_key_objective() {
        let def = definition(vec![objective("a", 10).as_key_objective()], 0.0, 0.0);
        let result = evaluate_analysis(&values(&[("a", "1")]), &def);
        assert_eq!(result.total_score, 0.0);
        assert_eq!(result.maximum_score, 10.0);
        assert!(!result.pass);
        assert!(!result.warning);
    }

    #[test]
    fn test_key_objective_in_warning_band_does_not_override() {
        let def = definition(vec![objective("a", 10).as_key_objective()], 80.0, 50.0);
        let result = evaluate_analysis(&values(&[("a", "17")]), &def);
        assert!(result.warning);
    }

    #[test]
    fn test_zero_weight_key_objective_vetoes_only_on_failure() {
        let def = definition(
            vec![objective("a", 0).as_key_objective(), objective("b", 10)],
            80.0,
            50.0,
        );

        let passing = evaluate_analysis(&values(&[("a", "30"), ("b", "30")]), &def);
        assert_eq!(passing.objective_results[0].score, 0.0);
        assert!(!passing.objective_results[0].is_failed());
        assert!(passing.pass);

        let failing = evaluate_analysis(&values(&[("a", "1"), ("b", "30")]), &def);
        assert!(!failing.pass);
        assert!(!failing.warning);

        let missing = evaluate_analysis(&values(&[("b", "30")]), &def);
        assert!(!missing.pass);
    }

    #[test]
    fn test_missing_value_counts_toward_maximum() {
        let def = definition(vec![objective("a", 10), objective("b", 10)], 50.0, 25.0);
        let result = evaluate_analysis(&values(&[("a", "30")]), &def);
        assert_eq!(result.total_score, 10.0);
        assert_eq!(result.maximum_score, 20.0);
        assert!(result.pass);
        assert_eq!(result.objective_results.len(), 2);
        assert!(result.objective_results[1].error.is_some());
    }
}
