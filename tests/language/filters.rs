//! Integration tests for filter expressions

use scopedsl_foundation::{ErrorCode, Value};
use scopedsl_language::{CompareOp, FilterExpr};
use serde_json::json;

#[test]
fn decode_comparisons() {
    let expr = FilterExpr::from_json(&json!({">=": [{"var": "core:stats.level"}, 3]})).unwrap();
    assert_eq!(
        expr,
        FilterExpr::compare(
            CompareOp::Ge,
            FilterExpr::var("core:stats.level"),
            FilterExpr::literal(3)
        )
    );
    assert_eq!(expr.kind_name(), "compare");
}

#[test]
fn decode_logic() {
    let expr = FilterExpr::from_json(&json!({
        "and": [
            {"!": {"var": "hidden"}},
            {"or": [{"in": ["red", {"var": "tags"}]}, {"condition_ref": "core:is-friendly"}]},
        ]
    }))
    .unwrap();
    let FilterExpr::And(items) = &expr else {
        panic!("expected and, got {expr:?}");
    };
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].kind_name(), "not");
    assert_eq!(items[1].children().len(), 2);
}

#[test]
fn non_objects_are_literals() {
    assert_eq!(
        FilterExpr::from_json(&json!(true)).unwrap(),
        FilterExpr::Literal(Value::Bool(true))
    );
}

#[test]
fn unknown_operators_are_kept_for_the_evaluator() {
    let expr = FilterExpr::from_json(&json!({"teleport": [1]})).unwrap();
    assert!(matches!(expr, FilterExpr::Unsupported { ref operator, .. } if &**operator == "teleport"));

    let expr = FilterExpr::from_json(&json!({"==": [1]})).unwrap();
    assert_eq!(expr.kind_name(), "unsupported");
}

#[test]
fn unknown_operators_render_as_written() {
    let ast = scopedsl_language::parse_scope(r#"actor[{"==": 1}]"#).unwrap();
    assert_eq!(ast.to_string(), r#"actor[{"==":1}]"#);
    assert_eq!(scopedsl_language::parse_scope(&ast.to_string()).unwrap(), ast);
}

#[test]
fn objects_need_exactly_one_operator() {
    let err = FilterExpr::from_json(&json!({"==": [1, 1], "!": true})).unwrap_err();
    assert_eq!(err.code(), ErrorCode::MalformedAst);
    assert!(FilterExpr::from_json(&json!({})).is_err());
}

#[test]
fn json_encoding_preserves_meaning() {
    let source = json!({"or": [
        {"matches": [{"var": "core:name.text"}, "^Sir "]},
        {"has_component": ["actor", "core:noble"]},
    ]});
    let expr = FilterExpr::from_json(&source).unwrap();
    assert_eq!(FilterExpr::from_json(&expr.to_json()).unwrap(), expr);
}
