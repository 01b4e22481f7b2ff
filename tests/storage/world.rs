//! Integration tests for World snapshots

use scopedsl_foundation::{EntityId, Value};
use scopedsl_storage::{EntityGateway, World};
use serde_json::json;

#[test]
fn spawn_and_despawn() {
    let world = World::new().spawn("hero").spawn("cloak");
    assert_eq!(world.entity_count(), 2);
    assert!(world.exists(&EntityId::new("hero")));

    let world = world.despawn(&EntityId::new("hero"));
    assert_eq!(world.entity_count(), 1);
    assert!(!world.exists(&EntityId::new("hero")));
}

#[test]
fn spawn_keeps_existing_components() {
    let world = World::new()
        .with_component("hero", "core:name", "Hero")
        .spawn("hero");
    assert_eq!(
        world.get_component(&EntityId::new("hero"), "core:name"),
        Some(Value::from("Hero"))
    );
}

#[test]
fn snapshots_are_independent() {
    let before = World::new().with_component("hero", "core:health", 10);
    let after = before.with_component("hero", "core:health", 5);
    let hero = EntityId::new("hero");
    assert_eq!(before.get_component(&hero, "core:health"), Some(Value::Int(10)));
    assert_eq!(after.get_component(&hero, "core:health"), Some(Value::Int(5)));
}

#[test]
fn component_removal() {
    let hero = EntityId::new("hero");
    let world = World::new()
        .with_component("hero", "core:name", "Hero")
        .with_component("hero", "core:actor", true);
    assert_eq!(world.component_types(&hero), vec!["core:actor", "core:name"]);

    let world = world.without_component(&hero, "core:actor");
    assert!(!world.has_component(&hero, "core:actor"));
    assert!(world.exists(&hero));

    let unchanged = world.without_component(&EntityId::new("nobody"), "core:actor");
    assert_eq!(unchanged, world);
}

#[test]
fn json_components() {
    let world = World::new().with_component(
        "hero",
        "clothing:equipment",
        json!({"equipped": {"torso": {"outer": "cloak"}}}),
    );
    let data = world
        .get_component(&EntityId::new("hero"), "clothing:equipment")
        .unwrap();
    assert_eq!(
        data.get_path("equipped.torso.outer"),
        Some(&Value::from("cloak"))
    );
}
