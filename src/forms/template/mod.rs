// SPDX-License-Identifier: MIT

//! Form templates and how they are loaded

pub mod loader;
mod types;

pub use loader::TemplateLoader;
pub use types::{slugify, FieldOption, FormField, FormTemplate, WidgetType};
