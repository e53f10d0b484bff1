//! Rule Registry Invariant Tests
//!
//! - Custom rules fire with the value and the schema argument
//! - Removing a rule turns later references into schema errors
//! - `required` and `null` can never be replaced or removed
//! - Registries are isolated from each other and from the built-in default

use std::sync::{Arc, Mutex};

use serde_json::json;
use shapeguard::{
    validate, InvalidArgument, RuleRegistry, Schema, SchemaError, Validator, Value,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn disallow(value: &Value, argument: &Value) -> Option<String> {
    let banned = argument.as_array()?;
    banned
        .contains(value)
        .then(|| format!("Disallowed value {}", value.coerce_to_string()))
}

fn title_schema() -> Schema {
    Schema::from_json(&json!({
        "title": { "_rules": { "type": "string", "disallow": ["Troy", "Alexander"] } }
    }))
    .unwrap()
}

// =============================================================================
// Custom Rule Lifecycle Tests
// =============================================================================

/// A custom rule receives the field value and its rule argument.
#[test]
fn test_custom_rule_fires_with_value_and_argument() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    let mut registry = RuleRegistry::new();
    registry
        .add("disallow", move |value, argument| {
            log.lock().unwrap().push((value.clone(), argument.clone()));
            disallow(value, argument)
        })
        .unwrap();

    let validator = Validator::new(&registry);
    let tree = validator
        .validate(&Value::from(json!({ "title": "Troy" })), &title_schema())
        .unwrap()
        .unwrap();
    assert_eq!(tree.message_at("title"), Some("Disallowed value Troy"));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, Value::from("Troy"));
    assert_eq!(seen[0].1, Value::from(json!(["Troy", "Alexander"])));
}

/// After removal, the same schema raises a schema error.
#[test]
fn test_removed_rule_becomes_schema_error() {
    let mut registry = RuleRegistry::new();
    registry.add("disallow", disallow).unwrap();

    let data = Value::from(json!({ "title": "300" }));
    assert_eq!(Validator::new(&registry).validate(&data, &title_schema()).unwrap(), None);

    registry.remove("disallow").unwrap();
    let err = Validator::new(&registry)
        .validate(&data, &title_schema())
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::UnknownRule {
            rule: "disallow".into(),
            path: "title".into()
        }
    );
}

/// Type failures short-circuit before custom rules run.
#[test]
fn test_custom_rule_runs_after_type_gate() {
    let calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&calls);

    let mut registry = RuleRegistry::new();
    registry
        .add("disallow", move |value, argument| {
            *counter.lock().unwrap() += 1;
            disallow(value, argument)
        })
        .unwrap();

    let tree = Validator::new(&registry)
        .validate(&Value::from(json!({ "title": 300 })), &title_schema())
        .unwrap()
        .unwrap();
    assert_eq!(tree.message_at("title"), Some("Invalid type"));
    assert_eq!(*calls.lock().unwrap(), 0);
}

/// Adding under an existing name replaces the predicate.
#[test]
fn test_add_overwrites() {
    let mut registry = RuleRegistry::new();
    registry.add("disallow", |_, _| Some("first".to_string())).unwrap();
    registry.add("disallow", |_, _| Some("second".to_string())).unwrap();

    let tree = Validator::new(&registry)
        .validate(&Value::from(json!({ "title": "300" })), &title_schema())
        .unwrap()
        .unwrap();
    assert_eq!(tree.message_at("title"), Some("second"));
}

// =============================================================================
// Reserved Name Tests
// =============================================================================

#[test]
fn test_reserved_names_cannot_be_added() {
    let mut registry = RuleRegistry::new();
    for name in ["required", "null"] {
        let err = registry.add(name, |_, _| None).unwrap_err();
        assert_eq!(err, InvalidArgument::ReservedRule(name.to_string()));
    }
}

#[test]
fn test_reserved_names_cannot_be_removed() {
    let mut registry = RuleRegistry::new();
    for name in ["required", "null"] {
        assert!(registry.remove(name).is_err());
        assert!(registry.contains(name));
    }

    // The gates still behave after the refused mutations.
    let schema = Schema::new().property("title", Schema::new().rule("required", true).rule("null", false));
    let validator = Validator::new(&registry);

    let tree = validator.validate(&Value::from(json!({})), &schema).unwrap().unwrap();
    assert_eq!(tree.message_at("title"), Some("Required"));

    let tree = validator
        .validate(&Value::from(json!({ "title": null })), &schema)
        .unwrap()
        .unwrap();
    assert_eq!(tree.message_at("title"), Some("Null"));
}

// =============================================================================
// Override and Isolation Tests
// =============================================================================

/// Non-reserved built-ins, gates included, may be replaced.
#[test]
fn test_type_gate_can_be_overridden() {
    let mut registry = RuleRegistry::new();
    registry
        .add("type", |value, argument| {
            let wanted = argument.as_str()?;
            (wanted == "even" && value.as_f64().map_or(true, |n| n % 2.0 != 0.0))
                .then(|| "Not even".to_string())
        })
        .unwrap();

    let schema = Schema::from_json(&json!({ "count": { "_rules": { "type": "even", "max": 10 } } })).unwrap();
    let validator = Validator::new(&registry);

    assert_eq!(validator.validate(&Value::from(json!({ "count": 4 })), &schema).unwrap(), None);
    let tree = validator
        .validate(&Value::from(json!({ "count": 3 })), &schema)
        .unwrap()
        .unwrap();
    assert_eq!(tree.message_at("count"), Some("Not even"));
    let tree = validator
        .validate(&Value::from(json!({ "count": 12 })), &schema)
        .unwrap()
        .unwrap();
    assert_eq!(tree.message_at("count"), Some("Above maximum"));

    // The built-in registry still rejects the token.
    let err = validate(&Value::from(json!({ "count": 4 })), &schema).unwrap_err();
    assert_eq!(err.code(), "SHAPE_UNSUPPORTED_TYPE");
}

/// A built-in can be removed like any custom rule.
#[test]
fn test_builtin_can_be_removed() {
    let mut registry = RuleRegistry::new();
    registry.remove("regex").unwrap();
    assert!(!registry.contains("regex"));

    let schema = Schema::from_json(&json!({ "tag": { "_rules": { "regex": "^a" } } })).unwrap();
    let err = Validator::new(&registry)
        .validate(&Value::from(json!({ "tag": "abc" })), &schema)
        .unwrap_err();
    assert_eq!(err.code(), "SHAPE_UNKNOWN_RULE");
}

#[test]
fn test_registries_are_isolated() {
    let mut first = RuleRegistry::new();
    first.add("disallow", disallow).unwrap();
    let second = RuleRegistry::new();
    let cloned = first.clone();

    assert!(first.contains("disallow"));
    assert!(cloned.contains("disallow"));
    assert!(!second.contains("disallow"));
    assert!(!RuleRegistry::builtin().contains("disallow"));

    first.remove("disallow").unwrap();
    assert!(cloned.contains("disallow"));
}

#[test]
fn test_names_are_sorted() {
    let mut registry = RuleRegistry::new();
    registry.add("aaa", |_, _| None).unwrap();
    let names = registry.names();
    assert_eq!(names[0], "aaa");
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

/// A shared registry serves validations on several threads.
#[test]
fn test_shared_registry_across_threads() {
    let mut registry = RuleRegistry::new();
    registry.add("disallow", disallow).unwrap();
    let registry = Arc::new(registry);

    let handles: Vec<_> = ["300", "Troy", "Alexander", "Gladiator"]
        .into_iter()
        .map(|title| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                Validator::new(&registry)
                    .validate(&Value::from(json!({ "title": title })), &title_schema())
                    .unwrap()
                    .is_some()
            })
        })
        .collect();

    let failed: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(failed, vec![false, true, true, false]);
}
