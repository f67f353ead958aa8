// SPDX-License-Identifier: MIT

//! Field validation
//!
//! - `ValidationRules` / `WidgetConfig` - lenient accessors over the
//!   free-form rule maps stored on each field
//! - `validate` - produces an `ErrorMap` for the visible fields

mod rules;
mod validator;

pub use rules::{ValidationRules, WidgetConfig};
pub use validator::{compile_pattern, validate, validate_field, ErrorMap};
