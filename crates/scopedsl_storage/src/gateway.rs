//! Read-only component lookup.
//!
//! The engine never owns entities. Everything it knows about the world
//! comes through this trait.

use scopedsl_foundation::{EntityId, Value};

/// Read-only access to entity components.
///
/// Implementations must be safe to share across threads; the engine keeps
/// no mutable state of its own, so concurrent resolutions only ever read
/// through the gateway.
pub trait EntityGateway: Send + Sync {
    /// Returns a component's data, or `None` if the entity lacks it.
    fn get_component(&self, entity: &EntityId, component: &str) -> Option<Value>;

    /// Returns true if the entity has the component.
    fn has_component(&self, entity: &EntityId, component: &str) -> bool {
        self.get_component(entity, component).is_some()
    }

    /// Returns every entity carrying the component, in a stable order.
    fn entities_with_component(&self, component: &str) -> Vec<EntityId>;

    /// Returns every known entity, in a stable order.
    fn entity_ids(&self) -> Vec<EntityId>;
}

impl<G: EntityGateway + ?Sized> EntityGateway for &G {
    fn get_component(&self, entity: &EntityId, component: &str) -> Option<Value> {
        (**self).get_component(entity, component)
    }

    fn has_component(&self, entity: &EntityId, component: &str) -> bool {
        (**self).has_component(entity, component)
    }

    fn entities_with_component(&self, component: &str) -> Vec<EntityId> {
        (**self).entities_with_component(component)
    }

    fn entity_ids(&self) -> Vec<EntityId> {
        (**self).entity_ids()
    }
}
