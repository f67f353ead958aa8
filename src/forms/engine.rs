// SPDX-License-Identifier: MIT

//! Evaluation pipeline: template + values -> visible set -> errors

use serde::Serialize;
use std::sync::Arc;

use crate::forms::lint::lint;
use crate::forms::template::FormTemplate;
use crate::forms::validation::{validate, ErrorMap};
use crate::forms::values::FormValues;
use crate::forms::visibility::{resolve_visibility, VisibleFields};

/// Result of one full evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Evaluation {
    pub visible: VisibleFields,
    pub errors: ErrorMap,
}

impl Evaluation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Stateless evaluator bound to one template.
///
/// Cloning is cheap; the template is shared.
#[derive(Debug, Clone)]
pub struct FormEngine {
    template: Arc<FormTemplate>,
}

impl FormEngine {
    /// Create an engine, logging any authoring problems in the template
    pub fn new(template: FormTemplate) -> Self {
        Self::from_shared(Arc::new(template))
    }

    pub fn from_shared(template: Arc<FormTemplate>) -> Self {
        for diagnostic in lint(&template) {
            log::warn!("Template '{}': {}", template.slug, diagnostic);
        }
        Self { template }
    }

    pub fn template(&self) -> &FormTemplate {
        &self.template
    }

    /// Fields visible for the given values
    pub fn visible_fields(&self, values: &FormValues) -> VisibleFields {
        resolve_visibility(&self.template.fields, values)
    }

    /// Validate values against an already computed visible set
    pub fn validate(&self, visible: &VisibleFields, values: &FormValues) -> ErrorMap {
        validate(&self.template.fields, visible, values)
    }

    /// Resolve visibility and validate in one pass
    pub fn evaluate(&self, values: &FormValues) -> Evaluation {
        let visible = self.visible_fields(values);
        let errors = self.validate(&visible, values);
        Evaluation { visible, errors }
    }
}
