// SPDX-License-Identifier: MIT

//! Validation rule and widget config maps
//!
//! Both are free-form JSON objects edited by administrators. Rule names
//! exist in snake_case and camelCase depending on which editor wrote them,
//! and numbers may be stored as strings, so lookups are lenient.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `validation_rules` of a field
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct ValidationRules(Map<String, Value>);

/// `widget_config` of a field
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct WidgetConfig(Map<String, Value>);

impl ValidationRules {
    pub fn new(rules: Map<String, Value>) -> Self {
        Self(rules)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn min_length(&self) -> Option<usize> {
        self.count(&["min_length", "minLength"])
    }

    pub fn max_length(&self) -> Option<usize> {
        self.count(&["max_length", "maxLength"])
    }

    /// Regex source; empty strings count as unset
    pub fn pattern(&self) -> Option<&str> {
        match self.0.get("pattern") {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    pub fn min_value(&self) -> Option<f64> {
        number_of(&self.0, &["min_value", "minValue"])
    }

    pub fn max_value(&self) -> Option<f64> {
        number_of(&self.0, &["max_value", "maxValue"])
    }

    pub fn max_files(&self) -> Option<usize> {
        self.count(&["max_files", "maxFiles"])
    }

    /// Largest accepted file, in megabytes
    pub fn max_file_size(&self) -> Option<f64> {
        number_of(&self.0, &["max_file_size", "maxFileSize"])
    }

    fn count(&self, keys: &[&str]) -> Option<usize> {
        number_of(&self.0, keys)
            .filter(|n| *n >= 0.0)
            .map(|n| n.floor() as usize)
    }
}

impl WidgetConfig {
    pub fn new(config: Map<String, Value>) -> Self {
        Self(config)
    }

    pub fn min(&self) -> Option<f64> {
        number_of(&self.0, &["min"])
    }

    pub fn max(&self) -> Option<f64> {
        number_of(&self.0, &["max"])
    }

    pub fn multiple(&self) -> bool {
        matches!(self.0.get("multiple"), Some(Value::Bool(true)))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// First key that holds a usable number. Blank strings (what the builder
/// stores after a bound is cleared) are treated as unset.
fn number_of(map: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| match map.get(*key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok(),
        _ => None,
    })
    .filter(|n| n.is_finite())
}
