//! Field validator
//!
//! Rules run in a fixed order per field and the first failure wins:
//! required, email format, length, pattern, numeric range, file count,
//! file size. Hidden fields are never validated.

use fancy_regex::Regex as PatternRegex;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use crate::forms::condition::coerce::{format_number, to_display_string, to_number};
use crate::forms::template::{FormField, WidgetType};
use crate::forms::values::FormValues;
use crate::forms::visibility::VisibleFields;

/// field_name -> message. Empty means the form is valid.
pub type ErrorMap = BTreeMap<String, String>;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

/// Compiled `pattern` rules keyed by source. `None` marks a pattern that
/// failed to compile.
static PATTERNS: Lazy<Mutex<HashMap<String, Option<Arc<PatternRegex>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Validate every visible field, in template order
pub fn validate(fields: &[FormField], visible: &VisibleFields, values: &FormValues) -> ErrorMap {
    fields
        .iter()
        .filter(|field| visible.contains(&field.field_name))
        .filter_map(|field| {
            validate_field(field, values.get(&field.field_name))
                .map(|message| (field.field_name.clone(), message))
        })
        .collect()
}

/// Validate one field's value, returning the first failing rule's message
pub fn validate_field(field: &FormField, value: Option<&Value>) -> Option<String> {
    let value = match value {
        Some(v) if !is_blank(v) => v,
        // Optional fields left blank skip every other rule
        _ if field.is_required => return Some(format!("{} is required", field.display_label())),
        _ => return None,
    };

    check_email(field, value)
        .or_else(|| check_length(field, value))
        .or_else(|| check_pattern(field, value))
        .or_else(|| check_range(field, value))
        .or_else(|| check_file_count(field, value))
        .or_else(|| check_file_size(field, value))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Text the length and pattern rules look at. Arrays and objects
/// (multi-selects, files) have no meaningful text form.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Array(_) | Value::Object(_) => None,
        other => Some(to_display_string(Some(other))),
    }
}

fn check_email(field: &FormField, value: &Value) -> Option<String> {
    if field.widget_type != WidgetType::Email {
        return None;
    }
    let text = to_display_string(Some(value));
    if EMAIL_RE.is_match(&text) {
        None
    } else {
        Some("Please enter a valid email address".to_string())
    }
}

fn check_length(field: &FormField, value: &Value) -> Option<String> {
    let rules = &field.validation_rules;
    // Counted in UTF-16 code units, as the browser reports input length
    let length = scalar_text(value)?.encode_utf16().count();

    if let Some(min) = rules.min_length() {
        if length < min {
            return Some(format!("Minimum {} characters required", min));
        }
    }
    if let Some(max) = rules.max_length() {
        if length > max {
            return Some(format!("Maximum {} characters allowed", max));
        }
    }
    None
}

fn check_pattern(field: &FormField, value: &Value) -> Option<String> {
    let source = field.validation_rules.pattern()?;
    let text = scalar_text(value)?;
    let re = compile_pattern(source)?;

    match re.is_match(&text) {
        Ok(true) => None,
        Ok(false) => Some(format!("{} format is invalid", field.display_label())),
        Err(e) => {
            log::warn!(
                "Skipping pattern on field '{}', match failed: {}",
                field.field_name,
                e
            );
            None
        }
    }
}

/// Compile a pattern once and reuse it. Patterns may use lookaround.
pub fn compile_pattern(source: &str) -> Option<Arc<PatternRegex>> {
    let mut cache = PATTERNS.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(compiled) = cache.get(source) {
        return compiled.clone();
    }

    let compiled = match PatternRegex::new(source) {
        Ok(re) => Some(Arc::new(re)),
        Err(e) => {
            log::warn!("Ignoring invalid pattern '{}': {}", source, e);
            None
        }
    };
    cache.insert(source.to_string(), compiled.clone());
    compiled
}

fn check_range(field: &FormField, value: &Value) -> Option<String> {
    let rules = &field.validation_rules;
    let (mut min, mut max) = (rules.min_value(), rules.max_value());
    if field.widget_type == WidgetType::Number {
        min = min.or_else(|| field.widget_config.min());
        max = max.or_else(|| field.widget_config.max());
    }
    if min.is_none() && max.is_none() {
        return None;
    }

    let n = to_number(Some(value));
    if n.is_nan() {
        return Some(format!("{} must be a number", field.display_label()));
    }
    if let Some(min) = min.filter(|min| n < *min) {
        return Some(format!("Value must be at least {}", format_number(min)));
    }
    if let Some(max) = max.filter(|max| n > *max) {
        return Some(format!("Value must be at most {}", format_number(max)));
    }
    None
}

fn files(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().filter(|v| v.is_object()).collect(),
        Value::Object(_) => vec![value],
        _ => Vec::new(),
    }
}

fn check_file_count(field: &FormField, value: &Value) -> Option<String> {
    let max = field.validation_rules.max_files()?;
    let count = match value {
        Value::Array(items) => items.len(),
        Value::Object(_) => 1,
        _ => 0,
    };
    (count > max).then(|| format!("Maximum {} files allowed", max))
}

fn check_file_size(field: &FormField, value: &Value) -> Option<String> {
    let max_mb = field.validation_rules.max_file_size()?;
    let limit = max_mb * BYTES_PER_MB;

    let too_large = files(value).into_iter().any(|file| {
        file.get("size")
            .and_then(Value::as_f64)
            .is_some_and(|size| size > limit)
    });
    too_large.then(|| format!("File size must not exceed {} MB", format_number(max_mb)))
}
