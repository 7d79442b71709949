//! Scoring results produced by the evaluator cascade.

use serde::{Deserialize, Serialize};

use super::objective::{Objective, Operator};

/// Outcome of one comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatorResult {
    pub operator: Operator,
    pub fulfilled: bool,
}

/// Outcome of a failure/warning comparison pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_result: Option<OperatorResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_result: Option<OperatorResult>,
    pub warning: bool,
    pub pass: bool,
}

impl TargetResult {
    pub fn is_failure(&self) -> bool {
        !self.pass && !self.warning
    }
}

/// Score and details for one objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveResult {
    pub objective: Objective,
    pub value: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub query: String,
    pub score: f64,
    pub result: TargetResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ObjectiveResult {
    /// Zero-score result for an objective that could not be evaluated.
    pub fn errored(objective: &Objective, query: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            objective: objective.clone(),
            value: 0.0,
            query: query.into(),
            score: 0.0,
            result: TargetResult::default(),
            error: Some(error.into()),
        }
    }

    /// True when the objective errored or failed its target. Independent of
    /// the score, so a zero-weight objective that passes is not failed.
    pub fn is_failed(&self) -> bool {
        self.error.is_some() || self.result.is_failure()
    }
}

/// Aggregate verdict for an analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub objective_results: Vec<ObjectiveResult>,
    pub total_score: f64,
    pub maximum_score: f64,
    pub pass: bool,
    pub warning: bool,
}

impl AnalysisResult {
    /// Share of the maximum score achieved, in percent. Zero when nothing can
    /// be scored.
    pub fn achieved_percentage(&self) -> f64 {
        if self.maximum_score == 0.0 {
            0.0
        } else {
            self.total_score / self.maximum_score * 100.0
        }
    }

    /// Serialized form persisted as the raw analysis status.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_achieved_percentage() {
        let result = AnalysisResult {
            total_score: 15.0,
            maximum_score: 20.0,
            ..Default::default()
        };
        assert!((result.achieved_percentage() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_achieved_percentage_without_objectives() {
        assert_eq!(AnalysisResult::default().achieved_percentage(), 0.0);
    }

    #[test]
    fn test_result_json_roundtrip_keeps_verdict() {
        let result = AnalysisResult {
            total_score: 10.0,
            maximum_score: 10.0,
            pass: true,
            ..Default::default()
        };
        let json = result.to_json().expect("serializable");
        assert!(json.contains("\"totalScore\":10.0"));
        let parsed: AnalysisResult = serde_json::from_str(&json).expect("parsable");
        assert!(parsed.pass);
    }
}
