//! Single-comparison evaluation.

use crate::domain::models::{Operator, OperatorResult};

/// Whether `value` satisfies `operator`. Range bounds are inclusive.
pub fn is_fulfilled(value: f64, operator: &Operator) -> bool {
    match operator {
        Operator::EqualTo(v) => value == v.fixed_value,
        Operator::LessThan(v) => value < v.fixed_value,
        Operator::LessThanOrEqual(v) => value <= v.fixed_value,
        Operator::GreaterThan(v) => value > v.fixed_value,
        Operator::GreaterThanOrEqual(v) => value >= v.fixed_value,
        Operator::InRange(r) => r.low_bound <= value && value <= r.high_bound,
        Operator::NotInRange(r) => value < r.low_bound || value > r.high_bound,
    }
}

pub fn evaluate_operator(value: f64, operator: &Operator) -> OperatorResult {
    OperatorResult {
        operator: *operator,
        fulfilled: is_fulfilled(value, operator),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_to() {
        assert!(is_fulfilled(5.0, &Operator::equal_to(5.0)));
        assert!(!is_fulfilled(5.1, &Operator::equal_to(5.0)));
    }

    #[test]
    fn test_less_than_boundaries() {
        assert!(is_fulfilled(4.9, &Operator::less_than(5.0)));
        assert!(!is_fulfilled(5.0, &Operator::less_than(5.0)));
        assert!(is_fulfilled(5.0, &Operator::less_than_or_equal(5.0)));
        assert!(!is_fulfilled(5.1, &Operator::less_than_or_equal(5.0)));
    }

    #[test]
    fn test_greater_than_boundaries() {
        assert!(is_fulfilled(5.1, &Operator::greater_than(5.0)));
        assert!(!is_fulfilled(5.0, &Operator::greater_than(5.0)));
        assert!(is_fulfilled(5.0, &Operator::greater_than_or_equal(5.0)));
        assert!(!is_fulfilled(4.9, &Operator::greater_than_or_equal(5.0)));
    }

    #[test]
    fn test_in_range_is_inclusive() {
        let range = Operator::in_range(10.0, 20.0);
        assert!(is_fulfilled(10.0, &range));
        assert!(is_fulfilled(15.0, &range));
        assert!(is_fulfilled(20.0, &range));
        assert!(!is_fulfilled(9.99, &range));
        assert!(!is_fulfilled(20.01, &range));
    }

    #[test]
    fn test_not_in_range_excludes_bounds() {
        let range = Operator::not_in_range(10.0, 20.0);
        assert!(!is_fulfilled(10.0, &range));
        assert!(!is_fulfilled(20.0, &range));
        assert!(is_fulfilled(9.0, &range));
        assert!(is_fulfilled(21.0, &range));
    }

    #[test]
    fn test_evaluate_operator_records_operator() {
        let result = evaluate_operator(3.0, &Operator::less_than(5.0));
        assert!(result.fulfilled);
        assert_eq!(result.operator, Operator::less_than(5.0));
    }
}
