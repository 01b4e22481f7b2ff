//! Integration tests for Value types
//!
//! Tests truthiness, strict equality, ordering, JSON conversion and paths.

use scopedsl_foundation::{EntityId, Value};
use serde_json::json;
use std::cmp::Ordering;

// =============================================================================
// Truthiness
// =============================================================================

#[test]
fn falsy_values() {
    for value in [
        Value::Null,
        Value::Bool(false),
        Value::Int(0),
        Value::Float(0.0),
        Value::from(""),
        Value::from_json(&json!([])),
    ] {
        assert!(!value.is_truthy(), "{value} should be falsy");
    }
}

#[test]
fn truthy_values() {
    for value in [
        Value::Bool(true),
        Value::Int(-1),
        Value::from("x"),
        Value::EntityRef(EntityId::new("cloak")),
        Value::from_json(&json!({})),
    ] {
        assert!(value.is_truthy(), "{value} should be truthy");
    }
}

// =============================================================================
// Equality and Ordering
// =============================================================================

#[test]
fn strict_eq_does_not_coerce() {
    assert!(!Value::Int(1).strict_eq(&Value::from("1")));
    assert!(!Value::Bool(true).strict_eq(&Value::Int(1)));
    assert!(!Value::Null.strict_eq(&Value::Bool(false)));
}

#[test]
fn strict_eq_compares_numbers_numerically() {
    assert!(Value::Int(2).strict_eq(&Value::Float(2.0)));
    assert!(!Value::Int(2).strict_eq(&Value::Float(2.5)));
}

#[test]
fn ordering_within_categories_only() {
    assert_eq!(Value::Int(1).compare(&Value::Float(1.5)), Some(Ordering::Less));
    assert_eq!(
        Value::from("b").compare(&Value::from("a")),
        Some(Ordering::Greater)
    );
    assert_eq!(Value::Int(1).compare(&Value::from("1")), None);
    assert_eq!(Value::Null.compare(&Value::Null), None);
}

// =============================================================================
// JSON Conversion
// =============================================================================

#[test]
fn json_numbers() {
    assert_eq!(Value::from_json(&json!(3)), Value::Int(3));
    assert_eq!(Value::from_json(&json!(1.5)), Value::Float(1.5));
}

#[test]
fn json_entity_refs_become_strings() {
    let value = Value::EntityRef(EntityId::new("hat"));
    assert_eq!(value.to_json(), json!("hat"));
}

#[test]
fn nested_paths() {
    let value = Value::from(json!({"equipped": {"torso": {"outer": "cloak"}}}));
    assert_eq!(
        value.get_path("equipped.torso.outer"),
        Some(&Value::from("cloak"))
    );
    assert_eq!(value.get_path("equipped.legs"), None);
    assert_eq!(value.get_path("equipped.torso.outer.x"), None);
}

#[test]
fn entity_id_from_strings() {
    assert_eq!(
        Value::from("cloak").to_entity_id(),
        Some(EntityId::new("cloak"))
    );
    assert_eq!(Value::from("").to_entity_id(), None);
    assert_eq!(Value::Int(3).to_entity_id(), None);
}

// =============================================================================
// Display
// =============================================================================

#[test]
fn display() {
    assert_eq!(Value::Null.to_string(), "null");
    assert_eq!(Value::from("a").to_string(), "\"a\"");
    assert_eq!(Value::EntityRef(EntityId::new("a")).to_string(), "#a");
    assert_eq!(Value::from(json!([1, 2])).to_string(), "[1, 2]");
}
