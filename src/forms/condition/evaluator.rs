//! Condition evaluator

use super::ast::{Condition, Operator};
use super::coerce::{is_nullish, loose_equals, to_display_string, to_number};
use crate::forms::values::FormValues;
use serde_json::Value;

/// Evaluate one operator against the current value of the referenced field.
///
/// `actual` is `None` when the value map has no entry for the field.
/// Unknown operators evaluate to `true` so that a rule the engine cannot
/// understand never hides input from the user.
pub fn evaluate(operator: &Operator, actual: Option<&Value>, expected: &Value) -> bool {
    match operator {
        Operator::Equals => loose_equals(actual, expected),
        Operator::NotEquals => !loose_equals(actual, expected),
        Operator::Contains => check_contains(actual, expected),
        Operator::NotContains => !is_nullish(actual) && !check_contains(actual, expected),
        Operator::GreaterThan => compare_numbers(actual, expected, |a, b| a > b),
        Operator::LessThan => compare_numbers(actual, expected, |a, b| a < b),
        Operator::GreaterThanOrEquals => compare_numbers(actual, expected, |a, b| a >= b),
        Operator::LessThanOrEquals => compare_numbers(actual, expected, |a, b| a <= b),
        Operator::IsEmpty => is_empty(actual),
        Operator::IsNotEmpty => !is_empty(actual),
        Operator::Unknown(name) => {
            log::warn!("Unknown condition operator '{}', treating as satisfied", name);
            true
        }
    }
}

/// Evaluate a condition against a value map
pub fn evaluate_condition(condition: &Condition, values: &FormValues) -> bool {
    if condition.field.is_empty() {
        log::debug!(
            "Condition with operator '{}' has no field reference",
            condition.operator
        );
        return false;
    }

    evaluate(
        &condition.operator,
        values.get(&condition.field),
        &condition.value,
    )
}

fn check_contains(actual: Option<&Value>, expected: &Value) -> bool {
    if is_nullish(actual) {
        return false;
    }
    to_display_string(actual).contains(&to_display_string(Some(expected)))
}

fn compare_numbers<F>(actual: Option<&Value>, expected: &Value, cmp: F) -> bool
where
    F: Fn(f64, f64) -> bool,
{
    // Comparisons against NaN are always false
    cmp(to_number(actual), to_number(Some(expected)))
}

fn is_empty(actual: Option<&Value>) -> bool {
    match actual {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}
