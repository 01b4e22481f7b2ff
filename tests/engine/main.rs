//! Integration tests for Layer 3: Engine
//!
//! Tests for clothing coverage, scope references, filters, and error handling.

mod clothing;
mod errors;
mod references;

use scopedsl_engine::{COVERAGE_COMPONENT, EQUIPMENT_COMPONENT, ResolveOptions, ScopeEngine};
use scopedsl_foundation::EntityId;
use scopedsl_storage::World;
use serde_json::json;

/// Returns a world where "hero" wears the given equipment.
pub fn dressed(equipped: serde_json::Value) -> World {
    World::new().with_component("hero", EQUIPMENT_COMPONENT, json!({ "equipped": equipped }))
}

/// Adds coverage metadata to an item.
pub fn covering(world: World, item: &str, covers: &[&str], tier: &str) -> World {
    world.with_component(
        item,
        COVERAGE_COMPONENT,
        json!({ "covers": covers, "coveragePriority": tier }),
    )
}

/// Resolves source text for "hero" and returns the result labels.
pub fn labels(world: &World, source: &str) -> Vec<String> {
    let result = ScopeEngine::new(world).resolve_source(
        source,
        &EntityId::new("hero"),
        &ResolveOptions::new(),
    );
    result
        .results()
        .unwrap_or_else(|| panic!("{source} failed: {:?}", result.error()))
        .iter()
        .map(scopedsl_engine::Item::label)
        .collect()
}
