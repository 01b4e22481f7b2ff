//! Abstract syntax tree for scope expressions.
//!
//! A scope is an immutable tree. References to other scopes are leaves
//! ([`AstNode::ScopeReference`]) resolved lazily by the engine, so cycles
//! only exist across registry entries, never inside one tree.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::filter::FilterExpr;
use crate::registry::ScopeId;

/// Named collections a scope expression can start from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SourceKind {
    /// The querying entity.
    Actor,
    /// The location the actor stands in (`core:position.locationId`).
    Location,
    /// Every entity carrying (or, when negated, lacking) a component.
    Entities {
        /// Component type to test.
        component: Arc<str>,
        /// Select entities *without* the component.
        negated: bool,
    },
}

/// How a clothing access handle expands under `[]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IterationMode {
    /// The single most visible accessible item per slot.
    #[default]
    Topmost,
    /// Like `Topmost`, but the accessories layer is never considered.
    TopmostNoAccessories,
    /// Every equipped item, ignoring coverage.
    All,
    /// Items on the outer layer only.
    Outer,
    /// Items on the armor layer only.
    Armor,
    /// Items on the base layer only.
    Base,
    /// Items on the underwear layer only.
    Underwear,
    /// Items on the accessories layer only.
    Accessories,
}

impl IterationMode {
    /// Maps an entity field name to the mode it selects.
    #[must_use]
    pub fn from_field(field: &str) -> Option<Self> {
        Some(match field {
            "topmost_clothing" => Self::Topmost,
            "topmost_clothing_no_accessories" => Self::TopmostNoAccessories,
            "all_clothing" => Self::All,
            "outer_clothing" => Self::Outer,
            "armor_clothing" => Self::Armor,
            "base_clothing" => Self::Base,
            "underwear" => Self::Underwear,
            "accessories" => Self::Accessories,
            _ => return None,
        })
    }

    /// Returns the field name that selects this mode.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Topmost => "topmost_clothing",
            Self::TopmostNoAccessories => "topmost_clothing_no_accessories",
            Self::All => "all_clothing",
            Self::Outer => "outer_clothing",
            Self::Armor => "armor_clothing",
            Self::Base => "base_clothing",
            Self::Underwear => "underwear",
            Self::Accessories => "accessories",
        }
    }

    /// Returns the single layer this mode is restricted to, if any.
    #[must_use]
    pub const fn layer(self) -> Option<&'static str> {
        match self {
            Self::Outer => Some("outer"),
            Self::Armor => Some("armor"),
            Self::Base => Some("base"),
            Self::Underwear => Some("underwear"),
            Self::Accessories => Some("accessories"),
            Self::Topmost | Self::TopmostNoAccessories | Self::All => None,
        }
    }

    /// Returns true if coverage blocking applies in this mode.
    #[must_use]
    pub const fn applies_coverage(self) -> bool {
        matches!(self, Self::Topmost | Self::TopmostNoAccessories)
    }
}

impl fmt::Display for IterationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// A node in a scope expression tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AstNode {
    /// A named starting collection.
    Source(SourceKind),
    /// Field access on each element of the parent result.
    PropertyAccess {
        /// The node producing the values to access.
        parent: Box<AstNode>,
        /// Field name (component type, data field, or clothing accessor).
        field: Arc<str>,
    },
    /// Expands each element of the parent result into its members.
    ArrayIteration {
        /// The node producing the collections to expand.
        parent: Box<AstNode>,
    },
    /// Keeps the parent elements for which the expression holds.
    Filter {
        /// The node producing the candidates.
        parent: Box<AstNode>,
        /// The boolean expression evaluated per candidate.
        expr: FilterExpr,
    },
    /// Ordered set union, left results first.
    Union {
        /// First operand.
        left: Box<AstNode>,
        /// Second operand.
        right: Box<AstNode>,
    },
    /// Evaluates another registered scope.
    ScopeReference(ScopeId),
}

impl AstNode {
    /// Creates an `actor` source.
    #[must_use]
    pub fn actor() -> Self {
        Self::Source(SourceKind::Actor)
    }

    /// Creates a `location` source.
    #[must_use]
    pub fn location() -> Self {
        Self::Source(SourceKind::Location)
    }

    /// Creates an `entities(component)` source.
    #[must_use]
    pub fn entities(component: &str) -> Self {
        Self::Source(SourceKind::Entities {
            component: component.into(),
            negated: false,
        })
    }

    /// Creates an `entities(!component)` source.
    #[must_use]
    pub fn entities_without(component: &str) -> Self {
        Self::Source(SourceKind::Entities {
            component: component.into(),
            negated: true,
        })
    }

    /// Creates a reference to another scope.
    #[must_use]
    pub fn reference(id: ScopeId) -> Self {
        Self::ScopeReference(id)
    }

    /// Wraps this node in a field access.
    #[must_use]
    pub fn field(self, field: &str) -> Self {
        Self::PropertyAccess {
            parent: Box::new(self),
            field: field.into(),
        }
    }

    /// Wraps this node in an array iteration.
    #[must_use]
    pub fn iterate(self) -> Self {
        Self::ArrayIteration {
            parent: Box::new(self),
        }
    }

    /// Wraps this node in a filter.
    #[must_use]
    pub fn filter(self, expr: FilterExpr) -> Self {
        Self::Filter {
            parent: Box::new(self),
            expr,
        }
    }

    /// Unions this node with another.
    #[must_use]
    pub fn union(self, other: AstNode) -> Self {
        Self::Union {
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    /// Returns the variant name, used in traces and errors.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Source(_) => "Source",
            Self::PropertyAccess { .. } => "PropertyAccess",
            Self::ArrayIteration { .. } => "ArrayIteration",
            Self::Filter { .. } => "Filter",
            Self::Union { .. } => "Union",
            Self::ScopeReference(_) => "ScopeReference",
        }
    }

    /// Returns the height of the tree (a lone source has depth 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Source(_) | Self::ScopeReference(_) => 1,
            Self::PropertyAccess { parent, .. }
            | Self::ArrayIteration { parent }
            | Self::Filter { parent, .. } => 1 + parent.depth(),
            Self::Union { left, right } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Collects the scope ids referenced anywhere in this tree.
    #[must_use]
    pub fn references(&self) -> Vec<&ScopeId> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a ScopeId>) {
        match self {
            Self::Source(_) => {}
            Self::ScopeReference(id) => out.push(id),
            Self::PropertyAccess { parent, .. }
            | Self::ArrayIteration { parent }
            | Self::Filter { parent, .. } => parent.collect_references(out),
            Self::Union { left, right } => {
                left.collect_references(out);
                right.collect_references(out);
            }
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if matches!(self, Self::Union { .. }) {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actor => write!(f, "actor"),
            Self::Location => write!(f, "location"),
            Self::Entities { component, negated } => {
                let bang = if *negated { "!" } else { "" };
                write!(f, "entities({bang}{component})")
            }
        }
    }
}

/// Renders the tree back into scope DSL text.
impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(kind) => write!(f, "{kind}"),
            Self::PropertyAccess { parent, field } => {
                parent.fmt_operand(f)?;
                write!(f, ".{field}")
            }
            Self::ArrayIteration { parent } => {
                parent.fmt_operand(f)?;
                write!(f, "[]")
            }
            Self::Filter { parent, expr } => {
                parent.fmt_operand(f)?;
                write!(f, "[{}]", expr.to_json())
            }
            Self::Union { left, right } => write!(f, "{left} + {right}"),
            Self::ScopeReference(id) => write!(f, "{id}"),
        }
    }
}
