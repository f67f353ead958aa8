// SPDX-License-Identifier: MIT

//! Template loader - JSON/YAML file loading and parsing
//!
//! Templates usually come from the REST API as JSON; YAML with the same
//! shape is accepted for hand-written fixtures.

use super::types::FormTemplate;
use crate::forms::error::{FormError, TemplateError};
use crate::forms::values::FormValues;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Loads form templates and value maps from disk
pub struct TemplateLoader;

impl TemplateLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a template, choosing the parser from the file extension
    pub fn load_template<P: AsRef<Path>>(&self, path: P) -> Result<FormTemplate, FormError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let template: FormTemplate = parse_by_extension(path, &content)?;
        Self::finish(template)
    }

    /// Load a value map (a single object keyed by field_name)
    pub fn load_values<P: AsRef<Path>>(&self, path: P) -> Result<FormValues, FormError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let value: serde_json::Value = parse_by_extension(path, &content)?;
        FormValues::from_json(value)
    }

    /// Parse a template from a JSON string
    pub fn parse_json(content: &str) -> Result<FormTemplate, FormError> {
        let template: FormTemplate = serde_json::from_str(content)?;
        Self::finish(template)
    }

    /// Parse a template from a YAML string
    pub fn parse_yaml(content: &str) -> Result<FormTemplate, FormError> {
        let template: FormTemplate = serde_yaml::from_str(content)?;
        Self::finish(template)
    }

    fn finish(mut template: FormTemplate) -> Result<FormTemplate, FormError> {
        template.normalize();
        template.check_unique_names()?;
        log::debug!(
            "Loaded template '{}' with {} fields",
            template.slug,
            template.fields.len()
        );
        Ok(template)
    }
}

impl Default for TemplateLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_by_extension<T: DeserializeOwned>(path: &Path, content: &str) -> Result<T, FormError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match extension.as_str() {
        "json" => Ok(serde_json::from_str(content)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(content)?),
        _ => Err(TemplateError::UnsupportedFormat(path.display().to_string()).into()),
    }
}
