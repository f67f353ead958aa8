// SPDX-License-Identifier: MIT

//! Visibility resolution
//!
//! Applies every field's conditional logic against the current values and
//! returns the set of fields that should be shown. The set is rebuilt from
//! scratch on each call.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::forms::condition::{evaluate_condition, Action, ConditionalLogic, LogicalOperator};
use crate::forms::template::FormField;
use crate::forms::values::FormValues;

/// field_names of the currently visible fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VisibleFields(BTreeSet<String>);

impl VisibleFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, field_name: &str) -> bool {
        self.0.contains(field_name)
    }

    pub fn insert(&mut self, field_name: &str) -> bool {
        self.0.insert(field_name.to_string())
    }

    pub fn remove(&mut self, field_name: &str) -> bool {
        self.0.remove(field_name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Visible field names ordered the way the template lists them
    pub fn in_template_order<'a>(&self, fields: &'a [FormField]) -> Vec<&'a str> {
        fields
            .iter()
            .map(|f| f.field_name.as_str())
            .filter(|name| self.contains(name))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for VisibleFields {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Compute which fields are visible for the given values.
///
/// Fields without conditions are seeded as visible first. Then, in template
/// order, each conditional field is added or removed according to its
/// action. Conditions read the referenced value even when the referenced
/// field is itself hidden.
pub fn resolve_visibility(fields: &[FormField], values: &FormValues) -> VisibleFields {
    let mut visible = VisibleFields::new();

    for field in fields {
        if !field.has_conditions() {
            visible.insert(&field.field_name);
        }
    }

    for field in fields {
        let Some(logic) = field.conditional_logic.as_ref().filter(|l| l.has_conditions()) else {
            continue;
        };

        let met = conditions_met(logic, values);
        match (met, logic.action) {
            (true, Action::Show) | (false, Action::Hide) => {
                visible.insert(&field.field_name);
            }
            (true, Action::Hide) => {
                visible.remove(&field.field_name);
            }
            (false, Action::Show) => {}
        }
    }

    visible
}

/// Combine a field's conditions with its logical operator
pub fn conditions_met(logic: &ConditionalLogic, values: &FormValues) -> bool {
    let mut results = logic
        .conditions
        .iter()
        .map(|condition| evaluate_condition(condition, values));

    match logic.logical_operator {
        LogicalOperator::And => results.all(|met| met),
        LogicalOperator::Or => results.any(|met| met),
    }
}
