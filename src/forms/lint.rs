// SPDX-License-Identifier: MIT

//! Authoring diagnostics
//!
//! Problems an administrator can introduce while editing a template. None
//! of them stop evaluation; they are reported so they can be fixed.

use fancy_regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

use crate::forms::template::FormTemplate;

/// One problem found in a template
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Field carrying the problem
    pub field: String,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A condition references the field it belongs to
    SelfReference,
    /// A condition references a field_name not in the template
    UnknownReference { target: String },
    /// A condition has an empty field reference and can never be met
    EmptyReference,
    /// Operator the engine does not know; the condition always passes
    UnknownOperator { operator: String },
    /// `validation_rules.pattern` does not compile; the rule is skipped
    InvalidPattern { message: String },
    /// A select/radio/multi-select field has nothing to choose from
    MissingOptions,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            DiagnosticKind::SelfReference => {
                write!(f, "{}: condition references the field itself", self.field)
            }
            DiagnosticKind::UnknownReference { target } => {
                write!(f, "{}: condition references unknown field '{}'", self.field, target)
            }
            DiagnosticKind::EmptyReference => {
                write!(f, "{}: condition has no field reference", self.field)
            }
            DiagnosticKind::UnknownOperator { operator } => {
                write!(f, "{}: unknown operator '{}'", self.field, operator)
            }
            DiagnosticKind::InvalidPattern { message } => {
                write!(f, "{}: invalid pattern: {}", self.field, message)
            }
            DiagnosticKind::MissingOptions => {
                write!(f, "{}: widget needs options but has none", self.field)
            }
        }
    }
}

/// Collect every authoring problem in template order
pub fn lint(template: &FormTemplate) -> Vec<Diagnostic> {
    let names: HashSet<&str> = template.field_names().collect();
    let mut diagnostics = Vec::new();

    for field in &template.fields {
        let mut report = |kind| {
            diagnostics.push(Diagnostic {
                field: field.field_name.clone(),
                kind,
            })
        };

        if field.widget_type.uses_options() && field.options.is_empty() {
            report(DiagnosticKind::MissingOptions);
        }

        if let Some(pattern) = field.validation_rules.pattern() {
            if let Err(e) = Regex::new(pattern) {
                report(DiagnosticKind::InvalidPattern {
                    message: e.to_string(),
                });
            }
        }

        let conditions = field
            .conditional_logic
            .iter()
            .flat_map(|logic| logic.conditions.iter());

        for condition in conditions {
            if condition.field.is_empty() {
                report(DiagnosticKind::EmptyReference);
            } else if condition.field == field.field_name {
                report(DiagnosticKind::SelfReference);
            } else if !names.contains(condition.field.as_str()) {
                report(DiagnosticKind::UnknownReference {
                    target: condition.field.clone(),
                });
            }

            if !condition.operator.is_known() {
                report(DiagnosticKind::UnknownOperator {
                    operator: condition.operator.to_string(),
                });
            }
        }
    }

    diagnostics
}
