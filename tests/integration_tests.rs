//! Integration tests for template loading, evaluation and submission
//!
//! These tests drive the public API end to end with realistic templates.

use formlogic_rs::forms::condition::evaluate;
use formlogic_rs::forms::condition::Operator;
use formlogic_rs::forms::lint::lint;
use formlogic_rs::forms::{
    EngineConfig, ErrorMap, FormEngine, FormSession, FormValues, SubmitOutcome, TemplateLoader,
};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::time::Duration;

// ============================================================================
// Fixtures
// ============================================================================

static APPLICATION_FORM: Lazy<String> = Lazy::new(|| {
    json!({
        "id": 3,
        "name": "Volunteer Application",
        "category": "community",
        "is_active": true,
        "fields": [
            {"field_name": "full_name", "label": "Full Name", "widget_type": "text",
             "is_required": true, "order": 1, "validation_rules": {"minLength": 2}},
            {"field_name": "email", "label": "Email", "widget_type": "email",
             "is_required": true, "order": 2},
            {"field_name": "age", "label": "Age", "widget_type": "number",
             "is_required": true, "order": 3,
             "validation_rules": {"minValue": 13, "maxValue": 120}},
            {"field_name": "newsletter", "label": "Subscribe to newsletter",
             "widget_type": "checkbox", "order": 4,
             "conditional_logic": {
                "action": "show",
                "conditions": [{"field": "age", "operator": "greater_than_or_equals", "value": 18}]
             }},
            {"field_name": "guardian_name", "label": "Guardian Name", "widget_type": "text",
             "is_required": true, "order": 5,
             "conditional_logic": {
                "action": "hide",
                "conditions": [{"field": "age", "operator": "greater_than_or_equals", "value": 18}]
             }},
            {"field_name": "role", "label": "Role", "widget_type": "select", "order": 6,
             "options": [
                {"value": "driver", "label": "Driver", "order": 1},
                {"value": "cook", "label": "Cook", "order": 2}
             ]},
            {"field_name": "license_number", "label": "License Number", "widget_type": "text",
             "is_required": true, "order": 7,
             "validation_rules": {"pattern": "^[A-Z]{2}[0-9]{6}$"},
             "conditional_logic": {
                "logicalOperator": "and",
                "conditions": [
                    {"field": "role", "operator": "equals", "value": "driver"},
                    {"field": "age", "operator": "greater_than_or_equals", "value": 18}
                ]
             }},
            {"field_name": "resume", "label": "Resume", "widget_type": "file", "order": 8,
             "widget_config": {"accept": ".pdf", "multiple": true},
             "validation_rules": {"maxFiles": 2, "maxFileSize": 5}}
        ]
    })
    .to_string()
});

fn engine() -> FormEngine {
    FormEngine::new(TemplateLoader::parse_json(&APPLICATION_FORM).unwrap())
}

fn values(value: Value) -> FormValues {
    FormValues::from_json(value).unwrap()
}

// ============================================================================
// Condition Evaluator
// ============================================================================

#[test]
fn test_operator_contract() {
    let eval = |op: &str, actual: Value, expected: Value| {
        evaluate(&Operator::from(op), Some(&actual), &expected)
    };

    assert!(eval("is_empty", json!(""), json!("anything")));
    assert!(!eval("is_empty", json!("x"), json!("anything")));
    assert!(eval("is_empty", json!(false), json!("anything")));
    assert!(eval("equals", json!("18"), json!(18)));
    assert!(!eval("greater_than", json!("abc"), json!(5)));

    for actual in [json!(null), json!(1), json!("x"), json!([1])] {
        assert!(eval("bogus_op", actual, json!("y")));
    }
}

// ============================================================================
// Visibility
// ============================================================================

#[test]
fn test_minor_sees_guardian_not_newsletter() {
    let visible = engine().visible_fields(&values(json!({"age": 17})));

    assert!(!visible.contains("newsletter"));
    assert!(visible.contains("guardian_name"));
    assert!(!visible.contains("license_number"));
}

#[test]
fn test_adult_sees_newsletter_not_guardian() {
    let visible = engine().visible_fields(&values(json!({"age": 18})));

    assert!(visible.contains("newsletter"));
    assert!(!visible.contains("guardian_name"));
}

#[test]
fn test_and_conditions_for_license() {
    let engine = engine();

    let driver = engine.visible_fields(&values(json!({"age": "25", "role": "driver"})));
    assert!(driver.contains("license_number"));

    let cook = engine.visible_fields(&values(json!({"age": "25", "role": "cook"})));
    assert!(!cook.contains("license_number"));

    let young_driver = engine.visible_fields(&values(json!({"age": "16", "role": "driver"})));
    assert!(!young_driver.contains("license_number"));
}

#[test]
fn test_unconditional_fields_visible_for_any_values() {
    let engine = engine();
    let samples = [
        json!({}),
        json!({"full_name": null, "email": false}),
        json!({"age": "not a number", "role": ["x", "y"]}),
    ];

    for sample in samples {
        let visible = engine.visible_fields(&values(sample));
        for name in ["full_name", "email", "age", "role", "resume"] {
            assert!(visible.contains(name), "{} should be visible", name);
        }
    }
}

#[test]
fn test_visibility_is_idempotent() {
    let engine = engine();
    let vals = values(json!({"age": 30, "role": "driver"}));
    assert_eq!(engine.visible_fields(&vals), engine.visible_fields(&vals));
}

#[test]
fn test_or_with_one_condition_met() {
    let template = TemplateLoader::parse_json(
        &json!({
            "fields": [
                {"field_name": "contact_method"},
                {"field_name": "urgent"},
                {"field_name": "phone", "widget_type": "phone",
                 "conditional_logic": {
                    "logicalOperator": "or",
                    "conditions": [
                        {"field": "contact_method", "operator": "equals", "value": "phone"},
                        {"field": "urgent", "operator": "equals", "value": true}
                    ]
                 }}
            ]
        })
        .to_string(),
    )
    .unwrap();
    let engine = FormEngine::new(template);

    let visible = engine.visible_fields(&values(json!({"contact_method": "email", "urgent": true})));
    assert!(visible.contains("phone"));
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_required_full_name() {
    let engine = engine();

    let result = engine.evaluate(&values(json!({"full_name": ""})));
    assert_eq!(
        result.errors.get("full_name"),
        Some(&"Full Name is required".to_string())
    );

    let result = engine.evaluate(&values(json!({"full_name": "Grace Hopper"})));
    assert!(!result.errors.contains_key("full_name"));
}

#[test]
fn test_errors_never_outside_visible_set() {
    let engine = engine();
    let samples = [
        json!({}),
        json!({"age": 10}),
        json!({"age": 40, "role": "driver", "license_number": "bad"}),
        json!({"email": "nope", "resume": [{"name": "a"}, {"name": "b"}, {"name": "c"}]}),
    ];

    for sample in samples {
        let result = engine.evaluate(&values(sample));
        for field_name in result.errors.keys() {
            assert!(result.visible.contains(field_name), "{} is hidden", field_name);
        }
    }
}

#[test]
fn test_full_valid_adult_driver() {
    let result = engine().evaluate(&values(json!({
        "full_name": "Grace Hopper",
        "email": "grace@navy.mil",
        "age": "45",
        "newsletter": true,
        "role": "driver",
        "license_number": "AB123456",
        "resume": [{"name": "cv.pdf", "size": 20480, "type": "application/pdf"}]
    })));

    assert!(result.is_valid(), "unexpected errors: {:?}", result.errors);
}

#[test]
fn test_each_rule_message() {
    let result = engine().evaluate(&values(json!({
        "full_name": "G",
        "email": "grace-at-navy",
        "age": 150,
        "role": "driver",
        "license_number": "ab123456",
        "resume": [
            {"name": "a.pdf", "size": 10},
            {"name": "b.pdf", "size": 10},
            {"name": "c.pdf", "size": 10}
        ]
    })));

    let expected: ErrorMap = [
        ("full_name", "Minimum 2 characters required"),
        ("email", "Please enter a valid email address"),
        ("age", "Value must be at most 120"),
        ("resume", "Maximum 2 files allowed"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    // age 150 is >= 18, so license_number is visible too
    let mut expected = expected;
    expected.insert(
        "license_number".to_string(),
        "License Number format is invalid".to_string(),
    );

    assert_eq!(result.errors, expected);
}

// ============================================================================
// Authoring problems
// ============================================================================

#[test]
fn test_broken_rules_degrade_without_failing() {
    let template = TemplateLoader::parse_yaml(
        r#"
name: Broken
fields:
  - field_name: a
  - field_name: b
    conditional_logic:
      conditions:
        - { field: b, operator: equals, value: x }
  - field_name: c
    conditional_logic:
      conditions:
        - { field: a, operator: sounds_like, value: x }
  - field_name: d
    conditional_logic:
      conditions:
        - { field: "", operator: is_empty, value: null }
  - field_name: e
    validation_rules: { pattern: "([" }
"#,
    )
    .unwrap();

    assert_eq!(lint(&template).len(), 4);

    let engine = FormEngine::new(template);
    let result = engine.evaluate(&values(json!({"e": "anything"})));

    // Self reference reads b's own (absent) value, unknown operator passes,
    // empty reference never passes, invalid pattern is skipped
    assert!(!result.visible.contains("b"));
    assert!(result.visible.contains("c"));
    assert!(!result.visible.contains("d"));
    assert!(result.is_valid());
}

// ============================================================================
// Session
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_session_fill_and_submit() {
    let config = EngineConfig::default().with_debounce_ms("50").unwrap();
    let mut session = FormSession::new(engine(), &config);

    for ch in ["1", "17"] {
        session.set_value("age", json!(ch));
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(session.visible().contains("guardian_name"));
    assert_eq!(session.evaluations(), 2);

    session.set_value("full_name", json!("Ada"));
    session.set_value("email", json!("ada@example.com"));

    let outcome = session.submit();
    assert_eq!(
        outcome,
        SubmitOutcome::Rejected(ErrorMap::from([(
            "guardian_name".to_string(),
            "Guardian Name is required".to_string()
        )]))
    );

    // Turning 18 hides the guardian field; submit sees it without waiting
    session.set_value("age", json!("18"));
    match session.submit() {
        SubmitOutcome::Accepted(data) => assert_eq!(data["age"], "18"),
        SubmitOutcome::Rejected(errors) => panic!("unexpected errors: {:?}", errors),
    }
}
