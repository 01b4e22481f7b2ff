//! Integration tests for error propagation and recovery

use scopedsl_engine::{
    COVERAGE_COMPONENT, CoverageFailurePolicy, EngineConfig, ResolveOptions, ScopeEngine,
};
use scopedsl_foundation::{EntityId, ErrorCode};
use scopedsl_language::AstNode;
use serde_json::json;

use crate::{covering, dressed};

fn bad_metadata_world() -> scopedsl_storage::World {
    let world = dressed(json!({
        "head": {"accessories": "hat"},
        "torso": {"outer": "cloak", "base": "shirt"},
    }));
    let world = covering(world, "cloak", &["torso"], "outer");
    let world = covering(world, "shirt", &["torso"], "base");
    world.with_component("hat", COVERAGE_COMPONENT, json!({"covers": "head", "coveragePriority": "hats"}))
}

#[test]
fn bad_metadata_fails_open_by_default() {
    let world = bad_metadata_world();
    let engine = ScopeEngine::new(&world);
    let hero = EntityId::new("hero");

    let result = engine.resolve_source("actor.topmost_clothing[]", &hero, &ResolveOptions::new());
    assert_eq!(result.entities(), vec![EntityId::new("hat"), EntityId::new("cloak")]);
    assert_eq!(result.diagnostics.len(), 1);
    let diagnostic = &result.diagnostics[0];
    assert_eq!(diagnostic.code, ErrorCode::CoverageMetadataError);
    assert!(diagnostic.recoverable);
    assert_eq!(diagnostic.context.entity, Some(EntityId::new("hat")));
    assert_eq!(diagnostic.context.slot.as_deref(), Some("head"));

    let result = engine.resolve_source("actor.all_clothing[]", &hero, &ResolveOptions::new());
    assert_eq!(result.entities().len(), 3);
}

#[test]
fn fail_closed_hides_bad_items() {
    let world = bad_metadata_world();
    let engine = ScopeEngine::new(&world).with_config(
        EngineConfig::default().with_coverage_failure(CoverageFailurePolicy::FailClosed),
    );
    let result = engine.resolve_source(
        "actor.topmost_clothing[]",
        &EntityId::new("hero"),
        &ResolveOptions::new(),
    );
    assert_eq!(result.entities(), vec![EntityId::new("cloak")]);
}

#[test]
fn validation_config_aborts() {
    let world = bad_metadata_world();
    let engine = ScopeEngine::new(&world).with_config(EngineConfig::validation());
    let result = engine.resolve_source(
        "actor.topmost_clothing[]",
        &EntityId::new("hero"),
        &ResolveOptions::new(),
    );
    assert_eq!(
        result.error().map(|e| e.code()),
        Some(ErrorCode::CoverageMetadataError)
    );
}

#[test]
fn missing_registry_is_missing_context() {
    let world = dressed(json!({}));
    let result = ScopeEngine::new(&world).resolve_source(
        "core:anything",
        &EntityId::new("hero"),
        &ResolveOptions::new(),
    );
    assert_eq!(result.error().map(|e| e.code()), Some(ErrorCode::MissingContext));
}

#[test]
fn malformed_nodes() {
    let world = dressed(json!({}));
    let engine = ScopeEngine::new(&world);
    let result = engine.resolve(
        &AstNode::actor().field(""),
        &EntityId::new("hero"),
        &ResolveOptions::new(),
    );
    assert_eq!(result.error().map(|e| e.code()), Some(ErrorCode::MalformedAst));
}

#[test]
fn bad_regex_is_recorded_once() {
    let world = dressed(json!({}))
        .with_component("a", "core:name", "x")
        .with_component("b", "core:name", "y");
    let result = ScopeEngine::new(&world).resolve_source(
        r#"entities(core:name)[{"matches": [{"var": "core:name"}, "("]}]"#,
        &EntityId::new("hero"),
        &ResolveOptions::new(),
    );
    assert!(result.is_ok());
    assert!(result.entities().is_empty());
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].code, ErrorCode::InvalidFilterPattern);
    assert_eq!(result.diagnostics[0].occurrences, 2);
}

#[test]
fn malformed_equipment_entries_are_skipped() {
    let world = dressed(json!({"torso": {"outer": 42, "base": "shirt"}}));
    let result = ScopeEngine::new(&world).resolve_source(
        "actor.all_clothing[]",
        &EntityId::new("hero"),
        &ResolveOptions::new(),
    );
    assert_eq!(result.entities(), vec![EntityId::new("shirt")]);
    assert_eq!(result.diagnostics[0].code, ErrorCode::CoverageMetadataError);
}
