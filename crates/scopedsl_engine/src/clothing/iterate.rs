//! Expanding equipment into candidates.

use std::sync::Arc;

use scopedsl_foundation::EntityId;
use scopedsl_language::IterationMode;

use super::coverage::CoverageAnalysis;
use super::equipment::{CoverageTier, EquippedItem, Equipment, Layer};

/// An item emitted by iteration, with where it was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// The item entity.
    pub item: EntityId,
    /// Slot it was found in.
    pub slot: Arc<str>,
    /// Layer it occupies.
    pub layer: Layer,
    /// Coverage tier, for callers that sort candidates.
    pub priority: CoverageTier,
}

/// What iteration did with one equipment entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// The entry was emitted.
    Include(Candidate),
    /// The entry was hidden by coverage.
    Skip {
        /// The hidden entry.
        entry: EquippedItem,
        /// The item hiding it, when one is known.
        blocked_by: Option<EntityId>,
    },
}

impl Decision {
    /// Returns the candidate if the entry was included.
    #[must_use]
    pub fn candidate(&self) -> Option<&Candidate> {
        match self {
            Self::Include(candidate) => Some(candidate),
            Self::Skip { .. } => None,
        }
    }
}

/// Expands equipment in the given mode.
///
/// Slots are visited in order and layers outermost first. In the topmost
/// modes the first accessible entry of each slot is emitted. Every other
/// entry of that slot is reported as skipped, naming its coverage blocker
/// or, failing that, the emitted entry. Topmost modes without an analysis treat every item as visible.
/// `slot` restricts iteration to one slot.
#[must_use]
pub fn iterate(
    equipment: &Equipment,
    mode: IterationMode,
    slot: Option<&str>,
    analysis: Option<&CoverageAnalysis>,
) -> Vec<Decision> {
    let in_scope = |entry: &&EquippedItem| slot.is_none_or(|s| &*entry.slot == s);
    let priority = |entry: &EquippedItem| {
        analysis
            .and_then(|a| a.tier_of(&entry.item))
            .unwrap_or_else(|| entry.layer.default_tier())
    };
    let include = |entry: &EquippedItem| {
        Decision::Include(Candidate {
            item: entry.item.clone(),
            slot: entry.slot.clone(),
            layer: entry.layer.clone(),
            priority: priority(entry),
        })
    };

    match mode {
        IterationMode::All => equipment.entries().iter().filter(in_scope).map(include).collect(),
        IterationMode::Outer
        | IterationMode::Armor
        | IterationMode::Base
        | IterationMode::Underwear
        | IterationMode::Accessories => {
            let layer = mode.layer().map(Layer::parse);
            equipment
                .entries()
                .iter()
                .filter(in_scope)
                .filter(|e| Some(&e.layer) == layer.as_ref())
                .map(include)
                .collect()
        }
        IterationMode::Topmost | IterationMode::TopmostNoAccessories => {
            let mut decisions = Vec::new();
            let mut emitted: Option<(&str, &EntityId)> = None;
            for entry in equipment.entries().iter().filter(in_scope) {
                if mode == IterationMode::TopmostNoAccessories && entry.layer == Layer::Accessories {
                    continue;
                }
                if let Some((_, top)) = emitted.filter(|(slot, _)| *slot == &*entry.slot) {
                    // shadowed by the slot's pick; accessibility is not consulted again
                    let blocker = analysis.and_then(|a| a.blocking_item_of(&entry.item));
                    decisions.push(Decision::Skip {
                        entry: entry.clone(),
                        blocked_by: Some(blocker.unwrap_or(top).clone()),
                    });
                    continue;
                }
                let accessible = analysis.is_none_or(|a| a.is_item_accessible(&entry.item));
                if accessible {
                    decisions.push(include(entry));
                    emitted = Some((&*entry.slot, &entry.item));
                } else {
                    decisions.push(Decision::Skip {
                        entry: entry.clone(),
                        blocked_by: analysis.and_then(|a| a.blocking_item_of(&entry.item)).cloned(),
                    });
                }
            }
            decisions
        }
    }
}
