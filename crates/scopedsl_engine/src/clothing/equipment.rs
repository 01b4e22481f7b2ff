//! Equipment snapshots.

use std::fmt;
use std::sync::Arc;

use scopedsl_foundation::{EntityId, Error, ErrorContext, Value};
use scopedsl_storage::EntityGateway;

/// Component holding `{ equipped: { <slot>: { <layer>: id | [ids] } } }`.
pub const EQUIPMENT_COMPONENT: &str = "clothing:equipment";

/// Component holding `{ covers: [area...], coveragePriority: tier }`.
pub const COVERAGE_COMPONENT: &str = "clothing:coverage_mapping";

// =============================================================================
// Layers and tiers
// =============================================================================

/// An equipment layer, ordered outermost first.
///
/// Unknown layer names sort after the known ones, alphabetically.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    /// Cloaks, coats.
    Outer,
    /// Protective gear.
    Armor,
    /// Everyday clothing.
    Base,
    /// Underclothes.
    Underwear,
    /// Jewelry, belts and the like.
    Accessories,
    /// Any other layer name.
    Other(Arc<str>),
}

impl Layer {
    /// Parses a layer name.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "outer" => Self::Outer,
            "armor" => Self::Armor,
            "base" => Self::Base,
            "underwear" => Self::Underwear,
            "accessories" => Self::Accessories,
            other => Self::Other(other.into()),
        }
    }

    /// Returns the layer name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Outer => "outer",
            Self::Armor => "armor",
            Self::Base => "base",
            Self::Underwear => "underwear",
            Self::Accessories => "accessories",
            Self::Other(name) => name,
        }
    }

    /// Returns the tier assumed for items on this layer without an explicit one.
    #[must_use]
    pub const fn default_tier(&self) -> CoverageTier {
        match self {
            Self::Outer => CoverageTier::Outer,
            Self::Armor => CoverageTier::Armor,
            Self::Base => CoverageTier::Base,
            Self::Underwear => CoverageTier::Underwear,
            Self::Accessories => CoverageTier::Accessories,
            Self::Other(_) => CoverageTier::Direct,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coverage priority tiers. Lower priority values hide higher ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CoverageTier {
    /// Priority 100.
    Outer,
    /// Priority 150.
    Armor,
    /// Priority 200.
    Base,
    /// Priority 300.
    Underwear,
    /// Priority 350.
    Accessories,
    /// Priority 400, for items without coverage metadata.
    Direct,
}

impl CoverageTier {
    /// Parses a tier name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "outer" => Self::Outer,
            "armor" => Self::Armor,
            "base" => Self::Base,
            "underwear" => Self::Underwear,
            "accessories" => Self::Accessories,
            "direct" => Self::Direct,
            _ => return None,
        })
    }

    /// Returns the numeric priority.
    #[must_use]
    pub const fn priority(self) -> u16 {
        match self {
            Self::Outer => 100,
            Self::Armor => 150,
            Self::Base => 200,
            Self::Underwear => 300,
            Self::Accessories => 350,
            Self::Direct => 400,
        }
    }

    /// Returns the tier name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Outer => "outer",
            Self::Armor => "armor",
            Self::Base => "base",
            Self::Underwear => "underwear",
            Self::Accessories => "accessories",
            Self::Direct => "direct",
        }
    }
}

impl fmt::Display for CoverageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.priority())
    }
}

// =============================================================================
// Equipment
// =============================================================================

/// One item at one slot and layer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EquippedItem {
    /// The item entity.
    pub item: EntityId,
    /// The slot it is worn in.
    pub slot: Arc<str>,
    /// The layer it occupies.
    pub layer: Layer,
    /// Position in the snapshot, used as the final tie-break.
    pub order: usize,
}

/// A read-only snapshot of what an entity wears.
///
/// Entries are ordered by slot name, then layer, then declaration order
/// within a layer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Equipment {
    owner: Option<EntityId>,
    entries: Vec<EquippedItem>,
}

impl Equipment {
    /// Reads an entity's equipment through the gateway.
    ///
    /// Malformed entries are skipped and returned as `CoverageMetadata`
    /// errors alongside the usable snapshot.
    #[must_use]
    pub fn load(gateway: &dyn EntityGateway, owner: &EntityId) -> (Self, Vec<Error>) {
        let component = gateway.get_component(owner, EQUIPMENT_COMPONENT);
        Self::from_component(owner, component.as_ref())
    }

    /// Builds a snapshot from the equipment component's data.
    #[must_use]
    pub fn from_component(owner: &EntityId, component: Option<&Value>) -> (Self, Vec<Error>) {
        let mut equipment = Self {
            owner: Some(owner.clone()),
            entries: Vec::new(),
        };
        let mut errors = Vec::new();
        let fail = |message: String, slot: Option<(&str, &str)>| {
            let mut context = ErrorContext::new().with_component("equipment");
            if let Some((slot, layer)) = slot {
                context = context.with_slot(slot, layer);
            }
            Error::coverage_metadata(owner.clone(), message).with_context(context)
        };

        let Some(equipped) = component.and_then(|c| c.get("equipped")) else {
            return (equipment, errors);
        };
        let Some(slots) = equipped.as_map() else {
            errors.push(fail(format!("`equipped` is a {}, not a map", equipped.type_name()), None));
            return (equipment, errors);
        };

        for (slot, layers) in slots.iter() {
            let Some(layers) = layers.as_map() else {
                errors.push(fail(
                    format!("slot `{slot}` is a {}, not a map", layers.type_name()),
                    None,
                ));
                continue;
            };

            let mut in_slot: Vec<(Layer, EntityId)> = Vec::new();
            for (layer_name, value) in layers.iter() {
                let layer = Layer::parse(layer_name);
                match value {
                    Value::Null => {}
                    Value::List(ids) => {
                        for id in ids.iter() {
                            match id.to_entity_id() {
                                Some(item) => in_slot.push((layer.clone(), item)),
                                None => errors.push(fail(
                                    format!("equipped entry is a {}, not an item id", id.type_name()),
                                    Some((&**slot, &**layer_name)),
                                )),
                            }
                        }
                    }
                    other => match other.to_entity_id() {
                        Some(item) => in_slot.push((layer, item)),
                        None => errors.push(fail(
                            format!("equipped entry is a {}, not an item id", other.type_name()),
                            Some((&**slot, &**layer_name)),
                        )),
                    },
                }
            }

            in_slot.sort_by(|a, b| a.0.cmp(&b.0));
            for (layer, item) in in_slot {
                let order = equipment.entries.len();
                equipment.entries.push(EquippedItem {
                    item,
                    slot: slot.clone(),
                    layer,
                    order,
                });
            }
        }

        (equipment, errors)
    }

    /// Builds a snapshot from `(slot, layer, item)` triples, in the given order.
    #[must_use]
    pub fn from_entries<I, S, L, E>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, L, E)>,
        S: AsRef<str>,
        L: AsRef<str>,
        E: Into<EntityId>,
    {
        let mut equipment = Self::default();
        for (slot, layer, item) in entries {
            let order = equipment.entries.len();
            equipment.entries.push(EquippedItem {
                item: item.into(),
                slot: slot.as_ref().into(),
                layer: Layer::parse(layer.as_ref()),
                order,
            });
        }
        equipment
            .entries
            .sort_by(|a, b| (&a.slot, &a.layer, a.order).cmp(&(&b.slot, &b.layer, b.order)));
        for (order, entry) in equipment.entries.iter_mut().enumerate() {
            entry.order = order;
        }
        equipment
    }

    /// Returns the wearer, when loaded from a component.
    #[must_use]
    pub fn owner(&self) -> Option<&EntityId> {
        self.owner.as_ref()
    }

    /// Returns every entry in snapshot order.
    #[must_use]
    pub fn entries(&self) -> &[EquippedItem] {
        &self.entries
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is equipped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the slot names in order.
    #[must_use]
    pub fn slots(&self) -> Vec<&str> {
        let mut slots: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if slots.last() != Some(&&*entry.slot) {
                slots.push(&entry.slot);
            }
        }
        slots
    }

    /// Returns the entries of one slot, outermost layer first.
    pub fn slot<'a>(&'a self, slot: &'a str) -> impl Iterator<Item = &'a EquippedItem> + 'a {
        self.entries.iter().filter(move |e| &*e.slot == slot)
    }

    /// Returns true if the item is worn at the slot and layer.
    #[must_use]
    pub fn is_worn_at(&self, item: &EntityId, slot: &str, layer: &Layer) -> bool {
        self.entries
            .iter()
            .any(|e| &e.item == item && &*e.slot == slot && &e.layer == layer)
    }
}
