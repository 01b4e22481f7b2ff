//! Integration tests for scope references and cycle detection

use scopedsl_engine::{EngineConfig, ResolveOptions, ScopeEngine};
use scopedsl_foundation::{EntityId, ErrorCode, ErrorKind};
use scopedsl_language::{AstNode, ScopeId, ScopeRegistry};
use scopedsl_storage::World;

fn registry(scopes: &[(&str, &str)]) -> ScopeRegistry {
    let mut registry = ScopeRegistry::new();
    for (id, source) in scopes {
        registry.register_source(id, source).unwrap();
    }
    registry
}

fn resolve(registry: &ScopeRegistry, scope: &str) -> scopedsl_engine::ResolutionResult {
    let world = World::new()
        .with_component("hero", "core:actor", true)
        .with_component("goblin", "core:actor", true);
    ScopeEngine::new(&world).with_registry(registry).resolve(
        &ScopeId::parse(scope).unwrap(),
        &EntityId::new("hero"),
        &ResolveOptions::traced(),
    )
}

#[test]
fn nested_references_resolve() {
    let registry = registry(&[
        ("core:everyone", "entities(core:actor)"),
        ("core:me", "actor"),
        ("core:both", "core:me + core:everyone"),
    ]);
    let result = resolve(&registry, "core:both");
    assert_eq!(
        result.entities(),
        vec![EntityId::new("hero"), EntityId::new("goblin")]
    );
}

#[test]
fn three_scope_cycle() {
    let registry = registry(&[("core:a", "core:b"), ("core:b", "core:c"), ("core:c", "core:a")]);
    let result = resolve(&registry, "core:a");
    let err = result.error().unwrap();
    assert_eq!(err.code(), ErrorCode::CycleDetected);
    assert_eq!(
        err.to_string(),
        "scope reference cycle: core:a -> core:b -> core:c -> core:a"
    );
    // the trace survives the failure
    let trace = result.trace.as_ref().unwrap();
    assert_eq!(trace.by_event_type("scope-enter").len(), 3);
    assert_eq!(trace.errors().len(), 1);
}

#[test]
fn cycle_entered_from_outside() {
    let registry = registry(&[
        ("core:entry", "actor + core:a"),
        ("core:a", "core:b"),
        ("core:b", "core:a"),
    ]);
    let err = resolve(&registry, "core:entry").outcome.unwrap_err();
    let ErrorKind::CycleDetected { chain } = &err.kind else {
        panic!("expected a cycle, got {err:?}");
    };
    assert_eq!(chain, &["core:entry", "core:a", "core:b", "core:a"]);
}

#[test]
fn self_reference() {
    let registry = registry(&[("core:loop", "core:loop")]);
    let err = resolve(&registry, "core:loop").outcome.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::CycleDetected { ref chain } if chain.len() == 2));
}

#[test]
fn repeated_use_is_not_a_cycle() {
    let registry = registry(&[
        ("core:me", "actor"),
        ("core:twice", "core:me + core:me"),
        ("core:nested", "core:twice + core:me"),
    ]);
    let result = resolve(&registry, "core:nested");
    assert!(result.is_ok());
    assert_eq!(result.entities(), vec![EntityId::new("hero")]);
}

#[test]
fn missing_reference_fails_the_whole_expression() {
    let registry = registry(&[("core:a", "actor + core:gone")]);
    let result = resolve(&registry, "core:a");
    assert_eq!(result.error().map(|e| e.code()), Some(ErrorCode::ScopeNotFound));
    let diagnostic = &result.diagnostics[0];
    assert_eq!(diagnostic.context.scope_chain, vec!["core:a"]);
    assert!(!diagnostic.recoverable);
}

#[test]
fn long_chains_hit_the_depth_limit() {
    let mut registry = ScopeRegistry::new();
    let id = |i: usize| ScopeId::parse(&format!("chain:s{i}")).unwrap();
    for i in 0..100 {
        registry.register(id(i), AstNode::reference(id(i + 1))).unwrap();
    }
    registry.register(id(100), AstNode::actor()).unwrap();

    let world = World::new();
    let engine = ScopeEngine::new(&world).with_registry(&registry);
    let result = engine.resolve(&id(0), &EntityId::new("hero"), &ResolveOptions::new());
    assert_eq!(result.error().map(|e| e.code()), Some(ErrorCode::DepthExceeded));

    let engine = engine.with_config(EngineConfig::default().with_max_depth(500));
    let result = engine.resolve(&id(0), &EntityId::new("hero"), &ResolveOptions::new());
    assert_eq!(result.entities(), vec![EntityId::new("hero")]);
}
