//! Integration tests for the EntityGateway contract

use scopedsl_foundation::{EntityId, Value};
use scopedsl_storage::{EntityGateway, World};

fn world() -> World {
    World::new()
        .with_component("guard", "core:actor", true)
        .with_component("hero", "core:actor", true)
        .with_component("chest", "core:container", true)
}

#[test]
fn entities_with_component_is_sorted() {
    let world = world();
    assert_eq!(
        world.entities_with_component("core:actor"),
        vec![EntityId::new("guard"), EntityId::new("hero")]
    );
    assert!(world.entities_with_component("core:missing").is_empty());
}

#[test]
fn entity_ids_lists_everything() {
    assert_eq!(world().entity_ids().len(), 3);
}

#[test]
fn missing_lookups_are_none() {
    let world = world();
    assert_eq!(world.get_component(&EntityId::new("nobody"), "core:actor"), None);
    assert!(!world.has_component(&EntityId::new("chest"), "core:actor"));
}

#[test]
fn gateway_as_trait_object() {
    let world = world();
    let gateway: &dyn EntityGateway = &world;
    assert_eq!(
        gateway.get_component(&EntityId::new("hero"), "core:actor"),
        Some(Value::Bool(true))
    );
}

fn actor_count(gateway: impl EntityGateway) -> usize {
    gateway.entities_with_component("core:actor").len()
}

#[test]
fn references_forward_to_the_gateway() {
    let world = world();
    assert_eq!(actor_count(&world), 2);
}
