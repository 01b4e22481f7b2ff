//! Integration tests for clothing iteration and coverage blocking

use scopedsl_engine::{
    CoverageAnalysis, CoverageFailurePolicy, CoverageTier, Equipment, ResolveOptions, ScopeEngine,
    TraceEvent,
};
use scopedsl_foundation::EntityId;
use serde_json::json;

use crate::{covering, dressed, labels};

// =============================================================================
// Basic Blocking
// =============================================================================

#[test]
fn outer_layer_hides_base_layer() {
    let world = dressed(json!({"torso": {"outer": "cloak", "base": "shirt"}}));
    let world = covering(world, "cloak", &["torso"], "outer");
    let world = covering(world, "shirt", &["torso"], "base");

    assert_eq!(labels(&world, "actor.topmost_clothing[]"), vec!["cloak"]);
    assert_eq!(labels(&world, "actor.all_clothing[]"), vec!["cloak", "shirt"]);
    assert_eq!(labels(&world, "actor.base_clothing[]"), vec!["shirt"]);
}

#[test]
fn disjoint_areas_do_not_interact() {
    let world = dressed(json!({
        "legs": {"base": "pants"},
        "torso": {"outer": "cloak"},
    }));
    let world = covering(world, "cloak", &["torso"], "outer");
    let world = covering(world, "pants", &["legs"], "base");

    assert_eq!(labels(&world, "actor.topmost_clothing[]"), vec!["pants", "cloak"]);
}

#[test]
fn coverage_crosses_slots() {
    let world = dressed(json!({
        "legs": {"base": "pants"},
        "torso": {"outer": "greatcoat"},
    }));
    let world = covering(world, "greatcoat", &["torso", "legs"], "outer");
    let world = covering(world, "pants", &["legs"], "base");

    assert_eq!(labels(&world, "actor.topmost_clothing[]"), vec!["greatcoat"]);
    assert_eq!(labels(&world, "actor.topmost_clothing.legs"), Vec::<String>::new());
}

#[test]
fn explicit_priority_overrides_layer() {
    // a base-layer item declared armor tier
    let world = dressed(json!({"torso": {"base": "mail", "underwear": "vest"}}));
    let world = covering(world, "mail", &["torso"], "armor");
    let world = covering(world, "vest", &["torso"], "underwear");

    let (equipment, errors) = Equipment::load(&world, &EntityId::new("hero"));
    assert!(errors.is_empty());
    let analysis = CoverageAnalysis::analyze(&equipment, &world, CoverageFailurePolicy::FailOpen);
    assert_eq!(analysis.tier_of(&EntityId::new("mail")), Some(CoverageTier::Armor));
    assert_eq!(
        analysis.blocking_item_of(&EntityId::new("vest")),
        Some(&EntityId::new("mail"))
    );
}

#[test]
fn equal_priority_breaks_ties_by_declaration_order() {
    let world = dressed(json!({"torso": {"outer": ["cloak", "tabard"]}}));
    let world = covering(world, "cloak", &["torso"], "outer");
    let world = covering(world, "tabard", &["torso"], "outer");

    assert_eq!(labels(&world, "actor.topmost_clothing[]"), vec!["cloak"]);
    assert_eq!(labels(&world, "actor.outer_clothing[]"), vec!["cloak", "tabard"]);
}

#[test]
fn missing_metadata_covers_own_slot() {
    let world = dressed(json!({"head": {"accessories": "hat"}, "torso": {"base": "shirt"}}));
    assert_eq!(labels(&world, "actor.topmost_clothing[]"), vec!["hat", "shirt"]);
    assert_eq!(
        labels(&world, "actor.topmost_clothing_no_accessories[]"),
        vec!["shirt"]
    );
    assert_eq!(labels(&world, "actor.accessories[]"), vec!["hat"]);
}

#[test]
fn item_worn_in_two_slots_never_blocks_itself() {
    let world = dressed(json!({
        "legs": {"outer": "robe"},
        "torso": {"outer": "robe"},
    }));
    let world = covering(world, "robe", &["torso", "legs"], "outer");
    assert_eq!(labels(&world, "actor.topmost_clothing[]"), vec!["robe"]);
    assert_eq!(labels(&world, "actor.all_clothing[]"), vec!["robe"]);
}

// =============================================================================
// Tracing
// =============================================================================

#[test]
fn skipped_items_name_their_blocker() {
    let world = dressed(json!({"torso": {"outer": "cloak", "base": "shirt"}}));
    let world = covering(world, "cloak", &["torso"], "outer");
    let world = covering(world, "shirt", &["torso"], "base");

    let result = ScopeEngine::new(&world).resolve_source(
        "actor.topmost_clothing[]",
        &EntityId::new("hero"),
        &ResolveOptions::traced(),
    );
    let trace = result.trace.unwrap();
    let skipped: Vec<_> = trace
        .iter()
        .filter_map(|r| match &r.event {
            TraceEvent::CandidateSkipped {
                item, blocked_by, ..
            } => Some((item.clone(), blocked_by.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(skipped, vec![("shirt".to_string(), Some(EntityId::new("cloak")))]);
}

#[test]
fn mode_override_applies_to_every_handle() {
    let world = dressed(json!({"torso": {"outer": "cloak", "base": "shirt"}}));
    let engine = ScopeEngine::new(&world);
    let options =
        ResolveOptions::new().with_iteration_mode(scopedsl_language::IterationMode::Base);
    let result = engine.resolve_source("actor.topmost_clothing[]", &EntityId::new("hero"), &options);
    assert_eq!(result.entities(), vec![EntityId::new("shirt")]);
}
