//! Integration tests for the scope registry

use scopedsl_foundation::ErrorCode;
use scopedsl_language::{AstNode, FilterExpr, ScopeId, ScopeRegistry};

fn id(s: &str) -> ScopeId {
    ScopeId::parse(s).unwrap()
}

#[test]
fn scope_ids() {
    let scope = id("clothing:visible");
    assert_eq!(scope.namespace(), "clothing");
    assert_eq!(scope.name(), "visible");
    for bad in ["visible", ":visible", "clothing:", "a b:c", "a:b.c"] {
        assert_eq!(
            ScopeId::parse(bad).unwrap_err().code(),
            ErrorCode::MalformedAst,
            "{bad}"
        );
    }
}

#[test]
fn register_and_lookup() {
    let mut registry = ScopeRegistry::new();
    let scope = registry
        .register_source("clothing:visible", "actor.topmost_clothing[]")
        .unwrap();
    let definition = registry.lookup(&scope).unwrap();
    assert_eq!(definition.source.as_deref(), Some("actor.topmost_clothing[]"));
    assert_eq!(registry.len(), 1);
    assert!(registry.lookup(&id("clothing:hidden")).is_none());
}

#[test]
fn duplicates_are_rejected() {
    let mut registry = ScopeRegistry::new();
    registry.register(id("core:me"), AstNode::actor()).unwrap();
    let err = registry.register(id("core:me"), AstNode::location()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::MalformedAst);
    assert_eq!(registry.lookup(&id("core:me")).unwrap().ast, AstNode::actor());
}

#[test]
fn bad_source_is_not_registered() {
    let mut registry = ScopeRegistry::new();
    let err = registry.register_source("core:bad", "actor.").unwrap_err();
    assert_eq!(err.code(), ErrorCode::Parse);
    assert!(registry.is_empty());
}

#[test]
fn dangling_references() {
    let mut registry = ScopeRegistry::new();
    registry.register_source("core:a", "core:b + core:gone").unwrap();
    registry.register_source("core:b", "actor").unwrap();
    let dangling = registry.dangling_references();
    assert_eq!(dangling, vec![(&id("core:a"), &id("core:gone"))]);
}

#[test]
fn conditions() {
    let mut registry = ScopeRegistry::new();
    registry
        .register_condition("core:is-actor", FilterExpr::has_component("core:actor"))
        .unwrap();
    assert!(registry.condition("core:is-actor").is_some());
    assert!(registry.condition("core:other").is_none());
    assert!(registry
        .register_condition("core:is-actor", FilterExpr::literal(true))
        .is_err());
}
