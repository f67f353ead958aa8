// SPDX-License-Identifier: MIT

//! Declarative conditional-logic blocks attached to form fields

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison operators a condition may use.
///
/// Operator names arrive as free-form strings from the template editor, so
/// anything unrecognized is kept as `Unknown` instead of failing the load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    GreaterThanOrEquals,
    LessThanOrEquals,
    IsEmpty,
    IsNotEmpty,
    /// Operator name the engine does not know about
    Unknown(String),
}

impl Operator {
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::GreaterThan => "greater_than",
            Operator::LessThan => "less_than",
            Operator::GreaterThanOrEquals => "greater_than_or_equals",
            Operator::LessThanOrEquals => "less_than_or_equals",
            Operator::IsEmpty => "is_empty",
            Operator::IsNotEmpty => "is_not_empty",
            Operator::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Operator::Unknown(_))
    }
}

impl From<&str> for Operator {
    fn from(name: &str) -> Self {
        match name {
            "equals" => Operator::Equals,
            "not_equals" => Operator::NotEquals,
            "contains" => Operator::Contains,
            "not_contains" => Operator::NotContains,
            "greater_than" => Operator::GreaterThan,
            "less_than" => Operator::LessThan,
            "greater_than_or_equals" => Operator::GreaterThanOrEquals,
            "less_than_or_equals" => Operator::LessThanOrEquals,
            "is_empty" => Operator::IsEmpty,
            "is_not_empty" => Operator::IsNotEmpty,
            other => Operator::Unknown(other.to_string()),
        }
    }
}

impl From<String> for Operator {
    fn from(name: String) -> Self {
        Operator::from(name.as_str())
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl JsonSchema for Operator {
    fn schema_name() -> String {
        "Operator".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}

/// What happens to a field when its conditions are met
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Show,
    Hide,
}

/// How multiple conditions combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    #[default]
    #[serde(alias = "AND")]
    And,
    #[serde(alias = "OR")]
    Or,
}

/// One atomic comparison against another field's value
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct Condition {
    /// field_name of the referenced field
    #[serde(default)]
    pub field: String,
    pub operator: Operator,
    /// Literal to compare against (string, number, boolean or null)
    #[serde(default)]
    pub value: Value,
}

/// A field's show/hide rule
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ConditionalLogic {
    #[serde(default)]
    pub action: Action,
    #[serde(
        default,
        rename = "logicalOperator",
        alias = "logical_operator"
    )]
    pub logical_operator: LogicalOperator,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl ConditionalLogic {
    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operator_round_trips_names() {
        for name in [
            "equals",
            "not_equals",
            "contains",
            "not_contains",
            "greater_than",
            "less_than",
            "greater_than_or_equals",
            "less_than_or_equals",
            "is_empty",
            "is_not_empty",
        ] {
            let op = Operator::from(name);
            assert!(op.is_known(), "{} should be known", name);
            assert_eq!(op.to_string(), name);
        }
    }

    #[test]
    fn test_unknown_operator_keeps_name() {
        let op: Operator = serde_json::from_value(json!("starts_with")).unwrap();
        assert_eq!(op, Operator::Unknown("starts_with".to_string()));
        assert!(!op.is_known());
        assert_eq!(serde_json::to_value(&op).unwrap(), json!("starts_with"));
    }

    #[test]
    fn test_conditional_logic_defaults() {
        let logic: ConditionalLogic = serde_json::from_value(json!({})).unwrap();
        assert_eq!(logic.action, Action::Show);
        assert_eq!(logic.logical_operator, LogicalOperator::And);
        assert!(!logic.has_conditions());
    }

    #[test]
    fn test_conditional_logic_deserialize() {
        let logic: ConditionalLogic = serde_json::from_value(json!({
            "action": "hide",
            "logicalOperator": "or",
            "conditions": [
                { "field": "status", "operator": "equals", "value": "closed" },
                { "field": "age", "operator": "less_than", "value": 18 }
            ]
        }))
        .unwrap();

        assert_eq!(logic.action, Action::Hide);
        assert_eq!(logic.logical_operator, LogicalOperator::Or);
        assert_eq!(logic.conditions.len(), 2);
        assert_eq!(logic.conditions[1].operator, Operator::LessThan);
        assert_eq!(logic.conditions[1].value, json!(18));
    }

    #[test]
    fn test_snake_case_logical_operator_alias() {
        let logic: ConditionalLogic =
            serde_json::from_value(json!({ "logical_operator": "or" })).unwrap();
        assert_eq!(logic.logical_operator, LogicalOperator::Or);
    }
}
