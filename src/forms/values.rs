// SPDX-License-Identifier: MIT

//! Current input values of a form being filled in

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::error::{FormError, TemplateError};

/// Map from field_name to the value the user has entered.
///
/// A missing entry and an explicit `null` are different: conditions see the
/// former as absent. The engine only ever reads from this map.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FormValues {
    fields: HashMap<String, Value>,
}

impl FormValues {
    /// Create an empty value map
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a value map from a JSON object
    pub fn from_json(value: Value) -> Result<Self, FormError> {
        match value {
            Value::Object(map) => Ok(Self {
                fields: map.into_iter().collect(),
            }),
            _ => Err(TemplateError::ValuesNotObject.into()),
        }
    }

    /// Set a field value, replacing any previous one.
    /// Returns true when the stored value actually changed.
    pub fn set(&mut self, key: &str, value: Value) -> bool {
        match self.fields.insert(key.to_string(), value) {
            Some(previous) => self.fields.get(key) != Some(&previous),
            None => true,
        }
    }

    /// Remove a field value entirely
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    /// Get a field value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Convert values to a JSON object
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Get all field names that have a value
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
