//! Resolution results.

use std::collections::HashSet;

use scopedsl_foundation::{EntityId, Error, Result, Value};
use scopedsl_language::IterationMode;

use crate::diagnostics::Diagnostic;
use crate::filter::FilterBreakdown;
use crate::trace::TraceBuffer;

/// A handle on an entity's equipment, expanded by `[]` or slot access.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClothingAccess {
    /// The entity wearing the equipment.
    pub owner: EntityId,
    /// How the equipment expands.
    pub mode: IterationMode,
}

/// One element of a result set.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Item {
    /// A plain value. Entities appear as [`Value::EntityRef`].
    Value(Value),
    /// The component table of an entity (`entity.components`).
    Components(EntityId),
    /// An unexpanded clothing accessor.
    Clothing(ClothingAccess),
}

impl Item {
    /// Wraps an entity id.
    #[must_use]
    pub fn entity(id: EntityId) -> Self {
        Self::Value(Value::EntityRef(id))
    }

    /// Returns the entity this item denotes, if any.
    ///
    /// Non-empty strings count as entity ids, since component data often
    /// stores references that way.
    #[must_use]
    pub fn as_entity(&self) -> Option<EntityId> {
        match self {
            Self::Value(value) => value.to_entity_id(),
            Self::Components(_) | Self::Clothing(_) => None,
        }
    }

    /// Returns the wrapped value, if this is a plain value.
    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Components(_) | Self::Clothing(_) => None,
        }
    }

    /// Returns a short label for traces.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Value(Value::EntityRef(id)) => id.to_string(),
            Self::Value(value) => value.to_string(),
            Self::Components(id) => format!("{id}.components"),
            Self::Clothing(access) => format!("{}.{}", access.owner, access.mode),
        }
    }
}

impl From<Value> for Item {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<EntityId> for Item {
    fn from(id: EntityId) -> Self {
        Self::entity(id)
    }
}

/// An ordered, duplicate-free collection of items.
///
/// Insertion order is preserved; inserting an item already present is a
/// no-op, so the first occurrence wins.
#[derive(Clone, Debug, Default)]
pub struct ResultSet {
    items: Vec<Item>,
    seen: HashSet<Item>,
}

impl ResultSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set holding one item.
    #[must_use]
    pub fn single(item: Item) -> Self {
        let mut set = Self::new();
        set.insert(item);
        set
    }

    /// Inserts an item, returning false if it was already present.
    pub fn insert(&mut self, item: Item) -> bool {
        if self.seen.contains(&item) {
            return false;
        }
        self.seen.insert(item.clone());
        self.items.push(item);
        true
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true if the item is present.
    #[must_use]
    pub fn contains(&self, item: &Item) -> bool {
        self.seen.contains(item)
    }

    /// Returns the items in order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Returns the union, this set's items first.
    #[must_use]
    pub fn union(mut self, other: ResultSet) -> ResultSet {
        self.extend(other.items);
        self
    }

    /// Returns the entity items, in order.
    #[must_use]
    pub fn entities(&self) -> Vec<EntityId> {
        self.items
            .iter()
            .filter_map(|item| match item {
                Item::Value(Value::EntityRef(id)) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    /// Returns the plain values, in order.
    #[must_use]
    pub fn values(&self) -> Vec<&Value> {
        self.items.iter().filter_map(Item::as_value).collect()
    }

    /// Consumes the set, returning the items in order.
    #[must_use]
    pub fn into_items(self) -> Vec<Item> {
        self.items
    }
}

impl Extend<Item> for ResultSet {
    fn extend<I: IntoIterator<Item = Item>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl FromIterator<Item> for ResultSet {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl PartialEq for ResultSet {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for ResultSet {}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Everything a `resolve` call produced.
///
/// The trace and diagnostics survive a failed resolution so callers can
/// explain the failure.
#[derive(Clone, Debug)]
pub struct ResolutionResult {
    /// The result set, or the fatal error that aborted resolution.
    pub outcome: Result<ResultSet>,
    /// The trace, when tracing was requested.
    pub trace: Option<TraceBuffer>,
    /// Filter breakdowns, when tracing was requested.
    pub breakdowns: Vec<FilterBreakdown>,
    /// Every error recorded, recoverable or not.
    pub diagnostics: Vec<Diagnostic>,
}

impl ResolutionResult {
    /// Returns true if resolution completed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Returns the result set, if resolution completed.
    #[must_use]
    pub fn results(&self) -> Option<&ResultSet> {
        self.outcome.as_ref().ok()
    }

    /// Returns the fatal error, if resolution failed.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        self.outcome.as_ref().err()
    }

    /// Returns the entity ids of a completed resolution, or an empty list.
    #[must_use]
    pub fn entities(&self) -> Vec<EntityId> {
        self.results().map(ResultSet::entities).unwrap_or_default()
    }

    /// Consumes the result, keeping only the outcome.
    ///
    /// # Errors
    /// Returns the fatal error that aborted resolution.
    pub fn into_result(self) -> Result<ResultSet> {
        self.outcome
    }
}
