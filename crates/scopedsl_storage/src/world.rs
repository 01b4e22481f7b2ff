//! Immutable in-memory world state.
//!
//! `World` is the reference [`EntityGateway`]: a snapshot of entities and
//! their components. Every mutation returns a new snapshot sharing
//! structure with the old one, so a resolution always sees a consistent
//! world even while the caller builds the next one.

use std::sync::Arc;

use scopedsl_foundation::{EntityId, LtMap, Value};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::gateway::EntityGateway;

/// Component data for one entity, keyed by component type.
type Components = LtMap<Arc<str>, Value>;

/// Immutable snapshot of entity/component state.
///
/// Clone is O(1) due to structural sharing.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct World {
    /// Entity → component type → data.
    entities: LtMap<EntityId, Components>,
}

impl World {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the entity exists.
    #[must_use]
    pub fn exists(&self, entity: &EntityId) -> bool {
        self.entities.contains_key(entity)
    }

    /// Returns a new world containing the entity with no components.
    ///
    /// Spawning an existing entity leaves its components untouched.
    #[must_use]
    pub fn spawn(&self, entity: impl Into<EntityId>) -> World {
        let entity = entity.into();
        if self.exists(&entity) {
            return self.clone();
        }
        World {
            entities: self.entities.insert(entity, Components::new()),
        }
    }

    /// Returns a new world without the entity.
    #[must_use]
    pub fn despawn(&self, entity: &EntityId) -> World {
        World {
            entities: self.entities.remove(entity),
        }
    }

    /// Returns a new world with the component set, spawning the entity if needed.
    #[must_use]
    pub fn with_component(
        &self,
        entity: impl Into<EntityId>,
        component: &str,
        value: impl Into<Value>,
    ) -> World {
        let entity = entity.into();
        let components = self
            .entities
            .get(&entity)
            .cloned()
            .unwrap_or_default()
            .insert(Arc::from(component), value.into());
        World {
            entities: self.entities.insert(entity, components),
        }
    }

    /// Returns a new world with the component removed.
    #[must_use]
    pub fn without_component(&self, entity: &EntityId, component: &str) -> World {
        match self.entities.get(entity) {
            Some(components) => World {
                entities: self
                    .entities
                    .insert(entity.clone(), components.remove(component)),
            },
            None => self.clone(),
        }
    }

    /// Returns the component types an entity carries, in order.
    #[must_use]
    pub fn component_types(&self, entity: &EntityId) -> Vec<&str> {
        self.entities
            .get(entity)
            .map(|c| c.keys().map(|k| &**k).collect())
            .unwrap_or_default()
    }
}

impl EntityGateway for World {
    fn get_component(&self, entity: &EntityId, component: &str) -> Option<Value> {
        self.entities.get(entity)?.get(component).cloned()
    }

    fn has_component(&self, entity: &EntityId, component: &str) -> bool {
        self.entities
            .get(entity)
            .is_some_and(|c| c.contains_key(component))
    }

    fn entities_with_component(&self, component: &str) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, c)| c.contains_key(component))
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn entity_ids(&self) -> Vec<EntityId> {
        self.entities.keys().cloned().collect()
    }
}
