// SPDX-License-Identifier: MIT

//! Conditional-logic and validation engine for dynamic forms
//!
//! - `condition` - single comparisons with explicit coercion
//! - `visibility` - show/hide resolution over a whole template
//! - `validation` - per-field rules producing an `ErrorMap`
//! - `scheduler` - debounced live evaluation and submit handling

pub mod condition;
pub mod config;
pub mod engine;
pub mod error;
pub mod lint;
pub mod scheduler;
pub mod template;
pub mod validation;
pub mod values;
pub mod visibility;

pub use config::EngineConfig;
pub use engine::{Evaluation, FormEngine};
pub use error::{FormError, TemplateError};
pub use scheduler::{Debouncer, FormSession, SubmitOutcome};
pub use template::{FormField, FormTemplate, TemplateLoader, WidgetType};
pub use validation::ErrorMap;
pub use values::FormValues;
pub use visibility::{resolve_visibility, VisibleFields};
