// SPDX-License-Identifier: MIT

//! Form template data model
//!
//! These types mirror the JSON documents the template API serves. Optional
//! sub-objects that are missing or `null` deserialize to "no rules".

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

use crate::forms::condition::ConditionalLogic;
use crate::forms::error::TemplateError;
use crate::forms::validation::{ValidationRules, WidgetConfig};

/// An administrator-authored form
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct FormTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Fields in display order
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: Vec<FormField>,
}

/// One input definition within a template
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct FormField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Stable key used by value maps and condition references
    pub field_name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub widget_type: WidgetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub widget_config: WidgetConfig,
    #[serde(default, deserialize_with = "null_as_default")]
    pub validation_rules: ValidationRules,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_logic: Option<ConditionalLogic>,
}

/// A value/label pair for select, radio and checkbox widgets
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct FieldOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub value: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub order: i64,
}

/// Supported widget types
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum WidgetType {
    #[default]
    Text,
    Email,
    Password,
    Textarea,
    Number,
    Date,
    Datetime,
    Select,
    Radio,
    Checkbox,
    File,
    MultiSelect,
    Phone,
    Url,
    /// Widget type this engine has no special handling for; validated like text
    Other(String),
}

impl WidgetType {
    pub fn as_str(&self) -> &str {
        match self {
            WidgetType::Text => "text",
            WidgetType::Email => "email",
            WidgetType::Password => "password",
            WidgetType::Textarea => "textarea",
            WidgetType::Number => "number",
            WidgetType::Date => "date",
            WidgetType::Datetime => "datetime",
            WidgetType::Select => "select",
            WidgetType::Radio => "radio",
            WidgetType::Checkbox => "checkbox",
            WidgetType::File => "file",
            WidgetType::MultiSelect => "multi_select",
            WidgetType::Phone => "phone",
            WidgetType::Url => "url",
            WidgetType::Other(name) => name,
        }
    }

    /// Widgets that render a list of `options`
    pub fn uses_options(&self) -> bool {
        matches!(
            self,
            WidgetType::Select | WidgetType::Radio | WidgetType::MultiSelect
        )
    }
}

impl From<String> for WidgetType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "text" => WidgetType::Text,
            "email" => WidgetType::Email,
            "password" => WidgetType::Password,
            "textarea" => WidgetType::Textarea,
            "number" => WidgetType::Number,
            "date" => WidgetType::Date,
            "datetime" => WidgetType::Datetime,
            "select" => WidgetType::Select,
            "radio" => WidgetType::Radio,
            "checkbox" => WidgetType::Checkbox,
            "file" => WidgetType::File,
            "multi_select" => WidgetType::MultiSelect,
            "phone" => WidgetType::Phone,
            "url" => WidgetType::Url,
            _ => WidgetType::Other(name),
        }
    }
}

impl From<WidgetType> for String {
    fn from(widget: WidgetType) -> Self {
        widget.as_str().to_string()
    }
}

impl std::fmt::Display for WidgetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl JsonSchema for WidgetType {
    fn schema_name() -> String {
        "WidgetType".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}

impl FormTemplate {
    /// Look up a field by its field_name
    pub fn field(&self, field_name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.field_name == field_name)
    }

    /// Field names in template order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.field_name.as_str())
    }

    /// Fail on the first field_name that appears twice
    pub fn check_unique_names(&self) -> Result<(), TemplateError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.field_name.as_str()) {
                return Err(TemplateError::DuplicateField(field.field_name.clone()));
            }
        }
        Ok(())
    }

    /// Stable-sort fields and their options by `order`, and derive a slug
    /// from the name when none was given.
    pub fn normalize(&mut self) {
        self.fields.sort_by_key(|f| f.order);
        for field in &mut self.fields {
            field.options.sort_by_key(|o| o.order);
        }
        if self.slug.is_empty() {
            self.slug = slugify(&self.name);
        }
    }
}

impl FormField {
    /// Label used in error messages, falling back to the field_name
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.field_name
        } else {
            &self.label
        }
    }

    /// True when the field carries at least one visibility condition
    pub fn has_conditions(&self) -> bool {
        self.conditional_logic
            .as_ref()
            .is_some_and(|logic| logic.has_conditions())
    }
}

/// Lowercase the name and collapse every run of other characters into `-`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

fn default_active() -> bool {
    true
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
