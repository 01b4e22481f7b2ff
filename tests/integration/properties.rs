//! Properties of resolution over generated wardrobes

use proptest::prelude::*;
use scopedsl::engine::{
    COVERAGE_COMPONENT, CoverageAnalysis, CoverageFailurePolicy, EQUIPMENT_COMPONENT, Equipment,
};
use scopedsl::{EntityId, ResolveOptions, ScopeEngine, World};
use serde_json::{Map, Value as Json, json};

const SLOTS: [&str; 3] = ["head", "legs", "torso"];
const LAYERS: [&str; 3] = ["outer", "base", "underwear"];
const AREAS: [&str; 4] = ["head", "legs", "torso", "arms"];

#[derive(Clone, Debug)]
struct Garment {
    slot: &'static str,
    layer: &'static str,
    covers: Vec<&'static str>,
    malformed: bool,
}

fn garment() -> impl Strategy<Value = Garment> {
    (
        prop::sample::select(SLOTS.to_vec()),
        prop::sample::select(LAYERS.to_vec()),
        prop::sample::subsequence(AREAS.to_vec(), 1..=AREAS.len()),
        prop::bool::weighted(0.15),
    )
        .prop_map(|(slot, layer, covers, malformed)| Garment {
            slot,
            layer,
            covers,
            malformed,
        })
}

fn wardrobe() -> impl Strategy<Value = Vec<Garment>> {
    prop::collection::vec(garment(), 1..10)
}

fn dress(garments: &[Garment]) -> World {
    let mut equipped = Map::new();
    for (i, g) in garments.iter().enumerate() {
        let slot = equipped
            .entry(g.slot)
            .or_insert_with(|| json!({}))
            .as_object_mut()
            .map(|layers| layers.entry(g.layer).or_insert_with(|| json!([])));
        if let Some(Json::Array(items)) = slot {
            items.push(json!(format!("g{i}")));
        }
    }

    let mut world = World::new().with_component(
        "hero",
        EQUIPMENT_COMPONENT,
        json!({"equipped": Json::Object(equipped)}),
    );
    for (i, g) in garments.iter().enumerate() {
        let mapping = if g.malformed {
            json!({"covers": "everything"})
        } else {
            json!({"covers": g.covers})
        };
        world = world.with_component(format!("g{i}"), COVERAGE_COMPONENT, mapping);
    }
    world
}

fn analyze(world: &World, policy: CoverageFailurePolicy) -> CoverageAnalysis {
    let (equipment, errors) = Equipment::load(world, &EntityId::new("hero"));
    assert!(errors.is_empty(), "{errors:?}");
    CoverageAnalysis::analyze(&equipment, world, policy)
}

fn resolve(world: &World, source: &str) -> Vec<EntityId> {
    let engine = ScopeEngine::new(world);
    let result = engine.resolve_source(source, &EntityId::new("hero"), &ResolveOptions::new());
    assert!(result.is_ok(), "{:?}", result.error());
    result.entities()
}

proptest! {
    #[test]
    fn blockers_never_rank_below_what_they_hide(garments in wardrobe()) {
        let world = dress(&garments);
        let analysis = analyze(&world, CoverageFailurePolicy::FailOpen);
        for entry in analysis.equipment().entries() {
            if let Some(blocker) = analysis.blocking_item_of(&entry.item) {
                prop_assert!(!analysis.is_item_accessible(&entry.item));
                prop_assert!(!analysis.is_degraded(blocker));
                prop_assert!(analysis.tier_of(blocker) <= analysis.tier_of(&entry.item));
            }
        }
    }

    #[test]
    fn malformed_items_stay_visible_under_fail_open(garments in wardrobe()) {
        let world = dress(&garments);
        let analysis = analyze(&world, CoverageFailurePolicy::FailOpen);
        for entry in analysis.equipment().entries() {
            if analysis.is_degraded(&entry.item) {
                prop_assert!(analysis.is_item_accessible(&entry.item));
            }
        }

        let closed = analyze(&world, CoverageFailurePolicy::FailClosed);
        for entry in closed.equipment().entries() {
            if closed.is_degraded(&entry.item) {
                prop_assert!(!closed.is_item_accessible(&entry.item));
                prop_assert_eq!(closed.blocking_item_of(&entry.item), None);
            }
        }
    }

    #[test]
    fn topmost_is_a_visible_subset_of_all(garments in wardrobe()) {
        let world = dress(&garments);
        let analysis = analyze(&world, CoverageFailurePolicy::FailOpen);
        let all = resolve(&world, "actor.all_clothing[]");
        let topmost = resolve(&world, "actor.topmost_clothing[]");

        prop_assert!(topmost.len() <= analysis.equipment().slots().len());
        for item in &topmost {
            prop_assert!(all.contains(item));
            prop_assert!(analysis.is_item_accessible(item));
        }
    }

    #[test]
    fn resolution_is_deterministic(garments in wardrobe()) {
        let world = dress(&garments);
        let engine = ScopeEngine::new(&world);
        let hero = EntityId::new("hero");
        let first = engine.resolve_source("actor.topmost_clothing[]", &hero, &ResolveOptions::traced());
        let second = engine.resolve_source("actor.topmost_clothing[]", &hero, &ResolveOptions::traced());

        prop_assert_eq!(first.entities(), second.entities());
        prop_assert_eq!(&first.diagnostics, &second.diagnostics);
        let events = |r: &scopedsl::ResolutionResult| {
            r.trace
                .as_ref()
                .map(|t| t.iter().map(|rec| rec.event.clone()).collect::<Vec<_>>())
                .unwrap_or_default()
        };
        prop_assert_eq!(events(&first), events(&second));
    }
}
