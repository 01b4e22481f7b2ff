//! Coverage blocking.
//!
//! For every body area, the items covering it are ordered by coverage tier,
//! then layer, then snapshot order. The first item in an area is visible
//! there and every later item is blocked by it. An item blocked in any area
//! is inaccessible as a whole.
//!
//! The analysis is a single pre-pass over the equipment; lookups afterwards
//! are constant time.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use scopedsl_foundation::{EntityId, Error, ErrorContext, Value};
use scopedsl_storage::EntityGateway;

use super::equipment::{COVERAGE_COMPONENT, CoverageTier, Equipment, Layer};
use crate::config::CoverageFailurePolicy;

/// Parsed `clothing:coverage_mapping` data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoverageMetadata {
    /// Body areas the item covers.
    pub covers: Vec<Arc<str>>,
    /// The item's coverage tier.
    pub tier: CoverageTier,
}

impl CoverageMetadata {
    /// The metadata assumed for an item without a coverage mapping: it
    /// covers only the slots it is worn in, at the lowest priority.
    #[must_use]
    pub fn fallback(slots: Vec<Arc<str>>) -> Self {
        Self {
            covers: slots,
            tier: CoverageTier::Direct,
        }
    }

    /// Parses a coverage mapping.
    ///
    /// A missing `covers` defaults to the item's own slots and a missing
    /// `coveragePriority` to the tier of its layer.
    ///
    /// # Errors
    /// Returns a description of the first malformed field.
    pub fn parse(value: &Value, slots: &[Arc<str>], layer: &Layer) -> Result<Self, String> {
        if value.as_map().is_none() {
            return Err(format!("coverage mapping is a {}, not a map", value.type_name()));
        }

        let covers = match value.get("covers") {
            None | Some(Value::Null) => slots.to_vec(),
            Some(Value::List(areas)) => areas
                .iter()
                .map(|area| match area.as_str() {
                    Some(name) if !name.is_empty() => Ok(Arc::from(name)),
                    _ => Err(format!("covered area {area} is not a name")),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => return Err(format!("`covers` is a {}, not a list", other.type_name())),
        };

        let tier = match value.get("coveragePriority") {
            None | Some(Value::Null) => layer.default_tier(),
            Some(Value::String(name)) => CoverageTier::from_name(name)
                .ok_or_else(|| format!("unknown coverage priority `{name}`"))?,
            Some(other) => {
                return Err(format!(
                    "`coveragePriority` is a {}, not a tier name",
                    other.type_name()
                ));
            }
        };

        Ok(Self { covers, tier })
    }
}

#[derive(Clone, Debug)]
struct ItemCoverage {
    tier: CoverageTier,
    layer: Layer,
    order: usize,
    accessible: bool,
    blocked_by: Option<EntityId>,
    degraded: bool,
}

impl ItemCoverage {
    fn rank(&self) -> (CoverageTier, &Layer, usize) {
        (self.tier, &self.layer, self.order)
    }
}

/// Accessibility of every item in an equipment snapshot.
#[derive(Clone, Debug, Default)]
pub struct CoverageAnalysis {
    equipment: Equipment,
    items: HashMap<EntityId, ItemCoverage>,
    errors: Vec<Error>,
}

impl CoverageAnalysis {
    /// Analyzes equipment, reading coverage mappings through the gateway.
    #[must_use]
    pub fn analyze(
        equipment: &Equipment,
        gateway: &dyn EntityGateway,
        policy: CoverageFailurePolicy,
    ) -> Self {
        Self::from_metadata(
            equipment,
            |item| gateway.get_component(item, COVERAGE_COMPONENT),
            policy,
        )
    }

    /// Analyzes equipment with a custom metadata source.
    ///
    /// Items whose metadata fails to parse take no part in blocking. Under
    /// [`CoverageFailurePolicy::FailClosed`] they are reported inaccessible,
    /// otherwise accessible; either way the failure is kept in
    /// [`errors`](Self::errors).
    #[must_use]
    pub fn from_metadata<F>(equipment: &Equipment, metadata: F, policy: CoverageFailurePolicy) -> Self
    where
        F: Fn(&EntityId) -> Option<Value>,
    {
        let mut analysis = Self {
            equipment: equipment.clone(),
            items: HashMap::new(),
            errors: Vec::new(),
        };

        // First position of each item, its outermost layer and every slot it
        // is worn in.
        let mut unique: Vec<(&EntityId, &Layer, usize, Vec<Arc<str>>)> = Vec::new();
        let mut index: HashMap<&EntityId, usize> = HashMap::new();
        for entry in equipment.entries() {
            if let Some(&i) = index.get(&entry.item) {
                if entry.layer < *unique[i].1 {
                    unique[i].1 = &entry.layer;
                }
                if !unique[i].3.contains(&entry.slot) {
                    unique[i].3.push(entry.slot.clone());
                }
            } else {
                index.insert(&entry.item, unique.len());
                unique.push((&entry.item, &entry.layer, entry.order, vec![entry.slot.clone()]));
            }
        }

        let mut areas: BTreeMap<Arc<str>, Vec<&EntityId>> = BTreeMap::new();
        for (item, layer, order, slots) in &unique {
            let item: &EntityId = *item;
            let parsed = match metadata(item) {
                None => Ok(CoverageMetadata::fallback(slots.clone())),
                Some(value) => CoverageMetadata::parse(&value, slots, layer),
            };

            let (tier, degraded) = match parsed {
                Ok(meta) => {
                    for area in meta.covers {
                        areas.entry(area).or_default().push(item);
                    }
                    (meta.tier, false)
                }
                Err(message) => {
                    analysis.errors.push(
                        Error::coverage_metadata(item.clone(), message).with_context(
                            ErrorContext::new()
                                .with_component("coverage")
                                .with_entity(item.clone())
                                .with_slot(&*slots[0], layer.as_str()),
                        ),
                    );
                    (layer.default_tier(), true)
                }
            };

            analysis.items.insert(
                item.clone(),
                ItemCoverage {
                    tier,
                    layer: (*layer).clone(),
                    order: *order,
                    accessible: !(degraded && policy == CoverageFailurePolicy::FailClosed),
                    blocked_by: None,
                    degraded,
                },
            );
        }

        // Per area: the best-ranked item blocks the rest.
        let mut blockers: HashMap<&EntityId, Vec<&EntityId>> = HashMap::new();
        for covering in areas.values_mut() {
            covering.dedup();
            covering.sort_by(|a, b| analysis.items[*a].rank().cmp(&analysis.items[*b].rank()));
            if let Some((&first, rest)) = covering.split_first() {
                for &blocked in rest {
                    if blocked != first {
                        blockers.entry(blocked).or_default().push(first);
                    }
                }
            }
        }

        for (blocked, candidates) in blockers {
            let best = candidates
                .into_iter()
                .min_by(|a, b| analysis.items[*a].rank().cmp(&analysis.items[*b].rank()))
                .cloned();
            if let Some(coverage) = analysis.items.get_mut(blocked) {
                coverage.accessible = false;
                coverage.blocked_by = best;
            }
        }

        analysis
    }

    /// Returns true if the item is worn at the slot and layer and not hidden.
    #[must_use]
    pub fn is_accessible(&self, item: &EntityId, slot: &str, layer: &Layer) -> bool {
        self.equipment.is_worn_at(item, slot, layer) && self.is_item_accessible(item)
    }

    /// Returns true if the item is worn and not hidden anywhere.
    #[must_use]
    pub fn is_item_accessible(&self, item: &EntityId) -> bool {
        self.items.get(item).is_some_and(|c| c.accessible)
    }

    /// Returns the item hiding this one, if it is blocked.
    #[must_use]
    pub fn blocking_item_of(&self, item: &EntityId) -> Option<&EntityId> {
        self.items.get(item)?.blocked_by.as_ref()
    }

    /// Returns the tier used for the item.
    #[must_use]
    pub fn tier_of(&self, item: &EntityId) -> Option<CoverageTier> {
        self.items.get(item).map(|c| c.tier)
    }

    /// Returns true if the item's metadata failed to parse.
    #[must_use]
    pub fn is_degraded(&self, item: &EntityId) -> bool {
        self.items.get(item).is_some_and(|c| c.degraded)
    }

    /// Returns the metadata errors found during analysis.
    #[must_use]
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// Returns the analyzed equipment.
    #[must_use]
    pub fn equipment(&self) -> &Equipment {
        &self.equipment
    }
}
