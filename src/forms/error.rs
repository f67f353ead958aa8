// SPDX-License-Identifier: MIT

//! Typed error handling for formlogic-rs
//!
//! Only loading and configuration can fail. Evaluation itself never
//! returns an error: authoring mistakes degrade to fail-open/fail-false
//! behavior and validation failures are reported as data.

use thiserror::Error;

/// Top-level error type for formlogic-rs
#[derive(Debug, Error)]
pub enum FormError {
    /// Template-specific errors
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Configuration errors (invalid env vars, bad flags)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Structural problems found while loading a template
#[derive(Debug, Error, PartialEq)]
pub enum TemplateError {
    /// Two fields share the same field_name
    #[error("Duplicate field name: {0}")]
    DuplicateField(String),

    /// File extension is not one of json, yaml, yml
    #[error("Unsupported template format: {0}")]
    UnsupportedFormat(String),

    /// Template is switched off by its administrator
    #[error("Form '{0}' is not active")]
    Inactive(String),

    /// Value map document is not a JSON/YAML object
    #[error("Values must be an object keyed by field name")]
    ValuesNotObject,
}

impl FormError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
