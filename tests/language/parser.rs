//! Integration tests for the scope DSL parser

use scopedsl_foundation::{ErrorCode, ErrorKind};
use scopedsl_language::{AstNode, FilterExpr, IterationMode, ScopeId, SourceKind, parse_scope};
use serde_json::json;

// =============================================================================
// Sources and Paths
// =============================================================================

#[test]
fn parse_sources() {
    assert_eq!(parse_scope("actor").unwrap(), AstNode::actor());
    assert_eq!(parse_scope("location").unwrap(), AstNode::location());
    assert_eq!(
        parse_scope("entities(core:actor)").unwrap(),
        AstNode::entities("core:actor")
    );
    assert_eq!(
        parse_scope("entities(!core:actor)").unwrap(),
        AstNode::entities_without("core:actor")
    );
}

#[test]
fn parse_clothing_path() {
    let ast = parse_scope("actor.topmost_clothing[]").unwrap();
    assert_eq!(ast, AstNode::actor().field("topmost_clothing").iterate());
    assert_eq!(ast.depth(), 3);
}

#[test]
fn parse_reference() {
    let ast = parse_scope("clothing:visible").unwrap();
    assert_eq!(
        ast,
        AstNode::reference(ScopeId::parse("clothing:visible").unwrap())
    );
}

#[test]
fn parse_union_is_left_associative() {
    let ast = parse_scope("actor + location | core:other").unwrap();
    let AstNode::Union { left, right } = ast else {
        panic!("expected a union");
    };
    assert!(matches!(*left, AstNode::Union { .. }));
    assert!(matches!(*right, AstNode::ScopeReference(_)));
}

#[test]
fn parse_filter() {
    let ast = parse_scope(r#"entities(core:actor)[{"==": [{"var": "id"}, "hero"]}]"#).unwrap();
    let AstNode::Filter { parent, expr } = ast else {
        panic!("expected a filter");
    };
    assert!(matches!(
        *parent,
        AstNode::Source(SourceKind::Entities { negated: false, .. })
    ));
    assert_eq!(expr.to_json(), json!({"==": [{"var": "id"}, "hero"]}));
}

#[test]
fn display_parses_back() {
    for source in [
        "actor.topmost_clothing[]",
        "entities(!core:actor)",
        "(actor + location).core:name",
        "core:a + core:b",
    ] {
        let ast = parse_scope(source).unwrap();
        assert_eq!(parse_scope(&ast.to_string()).unwrap(), ast, "{source}");
    }
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn parse_errors_carry_position() {
    for source in ["actor.", "actor +", "entities(", "(actor", "actor actor", ""] {
        let err = parse_scope(source).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Parse, "{source}");
        let ErrorKind::Parse { line, column, .. } = err.kind else {
            panic!("expected a parse error for {source:?}");
        };
        assert_eq!(line, 1);
        assert!(column >= 1);
    }
}

#[test]
fn parse_error_on_second_line() {
    let err = parse_scope("actor\n  .").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Parse { line: 2, .. }));
}

// =============================================================================
// Iteration Modes
// =============================================================================

#[test]
fn iteration_modes() {
    assert_eq!(
        IterationMode::from_field("topmost_clothing_no_accessories"),
        Some(IterationMode::TopmostNoAccessories)
    );
    assert_eq!(IterationMode::from_field("hat"), None);
    assert!(IterationMode::Topmost.applies_coverage());
    assert!(!IterationMode::All.applies_coverage());
    assert_eq!(IterationMode::Base.layer(), Some("base"));
    assert_eq!(IterationMode::default(), IterationMode::Topmost);
}

#[test]
fn builder_filter_matches_parsed_filter() {
    let built = AstNode::actor().filter(FilterExpr::has_component("core:actor"));
    let parsed = parse_scope(r#"actor[{"has_component": "core:actor"}]"#).unwrap();
    assert_eq!(built, parsed);
}
