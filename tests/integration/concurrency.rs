//! Sharing one engine between threads

use std::thread;

use scopedsl::engine::{COVERAGE_COMPONENT, EQUIPMENT_COMPONENT};
use scopedsl::{EntityId, ResolveOptions, ScopeEngine, ScopeRegistry, World};
use serde_json::json;

fn crowd(size: usize) -> World {
    let mut world = World::new();
    for i in 0..size {
        let id = format!("npc{i:03}");
        world = world
            .with_component(
                id.as_str(),
                EQUIPMENT_COMPONENT,
                json!({"equipped": {"torso": {"outer": format!("coat{i}"), "base": format!("shirt{i}")}}}),
            )
            .with_component(id.as_str(), "core:actor", json!({"level": i}));
        world = world
            .with_component(format!("coat{i}"), COVERAGE_COMPONENT, json!({"covers": ["torso"]}))
            .with_component(format!("shirt{i}"), COVERAGE_COMPONENT, json!({"covers": ["torso"]}));
    }
    world
}

#[test]
fn one_engine_many_threads() {
    let world = crowd(16);
    let mut registry = ScopeRegistry::new();
    registry
        .register_source("clothing:visible", "actor.topmost_clothing[]")
        .unwrap();
    registry
        .register_source(
            "core:peers",
            r#"entities(core:actor)[{">=": [{"var": "core:actor.level"}, {"var": "actor.core:actor.level"}]}]"#,
        )
        .unwrap();
    let engine = ScopeEngine::new(&world).with_registry(&registry);

    thread::scope(|s| {
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let engine = &engine;
                s.spawn(move || {
                    let actor = EntityId::new(format!("npc{i:03}"));
                    let visible = engine.resolve_source("clothing:visible", &actor, &ResolveOptions::traced());
                    let peers = engine.resolve_source("core:peers", &actor, &ResolveOptions::new());
                    (i, visible.entities(), peers.entities().len())
                })
            })
            .collect();

        for handle in handles {
            let (i, visible, peers) = handle.join().unwrap();
            assert_eq!(visible, vec![EntityId::new(format!("coat{i}"))]);
            assert_eq!(peers, 16 - i);
        }
    });
}

#[test]
fn concurrent_results_match_sequential_ones() {
    let world = crowd(8);
    let engine = ScopeEngine::new(&world);
    let sequential: Vec<_> = (0..8)
        .map(|i| {
            engine
                .resolve_source(
                    "actor.all_clothing[]",
                    &EntityId::new(format!("npc{i:03}")),
                    &ResolveOptions::new(),
                )
                .entities()
        })
        .collect();

    let concurrent: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let engine = &engine;
                s.spawn(move || {
                    engine
                        .resolve_source(
                            "actor.all_clothing[]",
                            &EntityId::new(format!("npc{i:03}")),
                            &ResolveOptions::new(),
                        )
                        .entities()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, concurrent);
}
