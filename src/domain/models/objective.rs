//! Analysis definitions: objectives, targets and comparison operators.

use serde::{Deserialize, Serialize};

/// Reference to a namespaced resource (value template, provider, definition).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectReference {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

impl ObjectReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: String::new(),
        }
    }

    pub fn namespaced(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// Stable key used to file provider results: `name`, or `name-namespace`.
    pub fn key(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}-{}", self.name, self.namespace)
        }
    }

    /// Returns a copy whose empty namespace is replaced by `namespace`.
    pub fn or_namespace(&self, namespace: &str) -> Self {
        if self.namespace.is_empty() {
            Self::namespaced(self.name.clone(), namespace)
        } else {
            self.clone()
        }
    }
}

impl std::fmt::Display for ObjectReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.namespace, self.name)
        }
    }
}

/// Single bound for a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorValue {
    pub fixed_value: f64,
}

/// Inclusive bounds for range comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeValue {
    pub low_bound: f64,
    pub high_bound: f64,
}

/// A single numeric comparison.
///
/// Serialized externally tagged, e.g. `{"lessThan": {"fixedValue": 15}}`, so a
/// configuration can never carry more than one comparison kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    EqualTo(OperatorValue),
    LessThan(OperatorValue),
    LessThanOrEqual(OperatorValue),
    GreaterThan(OperatorValue),
    GreaterThanOrEqual(OperatorValue),
    InRange(RangeValue),
    NotInRange(RangeValue),
}

impl Operator {
    pub fn equal_to(value: f64) -> Self {
        Self::EqualTo(OperatorValue { fixed_value: value })
    }

    pub fn less_than(value: f64) -> Self {
        Self::LessThan(OperatorValue { fixed_value: value })
    }

    pub fn less_than_or_equal(value: f64) -> Self {
        Self::LessThanOrEqual(OperatorValue { fixed_value: value })
    }

    pub fn greater_than(value: f64) -> Self {
        Self::GreaterThan(OperatorValue { fixed_value: value })
    }

    pub fn greater_than_or_equal(value: f64) -> Self {
        Self::GreaterThanOrEqual(OperatorValue { fixed_value: value })
    }

    pub fn in_range(low_bound: f64, high_bound: f64) -> Self {
        Self::InRange(RangeValue {
            low_bound,
            high_bound,
        })
    }

    pub fn not_in_range(low_bound: f64, high_bound: f64) -> Self {
        Self::NotInRange(RangeValue {
            low_bound,
            high_bound,
        })
    }
}

/// Failure/warning comparison pair attached to an objective.
///
/// A value that fulfils `failure` fails the objective; otherwise a value that
/// fulfils `warning` puts it in the warning band.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Target {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<Operator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<Operator>,
}

impl Target {
    pub fn failing_when(failure: Operator) -> Self {
        Self {
            failure: Some(failure),
            warning: None,
        }
    }

    pub fn with_warning(mut self, warning: Operator) -> Self {
        self.warning = Some(warning);
        self
    }
}

/// One weighted check within an analysis definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    pub analysis_value_template_ref: ObjectReference,
    #[serde(default)]
    pub target: Target,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub key_objective: bool,
}

const fn default_weight() -> u32 {
    1
}

impl Objective {
    pub fn new(template: ObjectReference, target: Target) -> Self {
        Self {
            analysis_value_template_ref: template,
            target,
            weight: default_weight(),
            key_objective: false,
        }
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn as_key_objective(mut self) -> Self {
        self.key_objective = true;
        self
    }

    /// Key under which this objective's provider result is filed.
    pub fn key(&self) -> String {
        self.analysis_value_template_ref.key()
    }
}

/// Percentages an analysis must reach to pass, or to pass with a warning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalScore {
    pub pass_percentage: f64,
    pub warning_percentage: f64,
}

/// Named collection of objectives plus the score thresholds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub objectives: Vec<Objective>,
    #[serde(default)]
    pub total_score: TotalScore,
}
