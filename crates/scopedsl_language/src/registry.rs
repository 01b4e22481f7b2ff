//! Named scopes and conditions.
//!
//! The registry is populated by the caller and read by the engine. It is
//! plain data: lookups never mutate it, so one registry can serve many
//! concurrent resolutions.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use scopedsl_foundation::{Error, Result};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ast::AstNode;
use crate::filter::FilterExpr;
use crate::parser::parse_scope;

/// A namespaced scope identifier of the form `mod:name`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScopeId(Arc<str>);

impl ScopeId {
    /// Parses and validates an identifier.
    ///
    /// Both halves must be non-empty and consist of ASCII letters, digits,
    /// `_` or `-`.
    ///
    /// # Errors
    /// Returns a `MalformedAst` error for an invalid identifier.
    pub fn parse(text: &str) -> Result<Self> {
        let valid_part =
            |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        match text.split_once(':') {
            Some((namespace, name)) if valid_part(namespace) && valid_part(name) => {
                Ok(Self(text.into()))
            }
            _ => Err(Error::malformed_ast(format!(
                "invalid scope id `{text}`: expected `mod:name`"
            ))),
        }
    }

    /// Returns the full identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the part before the colon.
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.0.split_once(':').map_or("", |(ns, _)| ns)
    }

    /// Returns the part after the colon.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.split_once(':').map_or("", |(_, name)| name)
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered scope.
#[derive(Clone, Debug, PartialEq)]
pub struct ScopeDefinition {
    /// The scope's identifier.
    pub id: ScopeId,
    /// The parsed expression.
    pub ast: AstNode,
    /// DSL source, when registered from text.
    pub source: Option<Arc<str>>,
}

/// Scope and condition lookup tables.
#[derive(Clone, Debug, Default)]
pub struct ScopeRegistry {
    scopes: BTreeMap<ScopeId, ScopeDefinition>,
    conditions: BTreeMap<Arc<str>, FilterExpr>,
}

impl ScopeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a scope from an AST.
    ///
    /// # Errors
    /// Returns a `MalformedAst` error if the id is already registered.
    pub fn register(&mut self, id: ScopeId, ast: AstNode) -> Result<()> {
        self.insert(ScopeDefinition {
            id,
            ast,
            source: None,
        })
    }

    /// Parses and registers a scope from DSL text.
    ///
    /// # Errors
    /// Returns an error if the id is invalid or taken, or the text does not parse.
    pub fn register_source(&mut self, id: &str, source: &str) -> Result<ScopeId> {
        let id = ScopeId::parse(id)?;
        let ast = parse_scope(source)?;
        self.insert(ScopeDefinition {
            id: id.clone(),
            ast,
            source: Some(source.into()),
        })?;
        Ok(id)
    }

    fn insert(&mut self, definition: ScopeDefinition) -> Result<()> {
        if self.scopes.contains_key(&definition.id) {
            return Err(Error::malformed_ast(format!(
                "scope `{}` is already registered",
                definition.id
            )));
        }
        self.scopes.insert(definition.id.clone(), definition);
        Ok(())
    }

    /// Registers a named condition.
    ///
    /// # Errors
    /// Returns a `MalformedAst` error if the id is invalid or already registered.
    pub fn register_condition(&mut self, id: &str, expr: FilterExpr) -> Result<()> {
        let id = ScopeId::parse(id)?;
        if self.conditions.contains_key(id.as_str()) {
            return Err(Error::malformed_ast(format!(
                "condition `{id}` is already registered"
            )));
        }
        self.conditions.insert(id.as_str().into(), expr);
        Ok(())
    }

    /// Looks up a scope.
    #[must_use]
    pub fn lookup(&self, id: &ScopeId) -> Option<&ScopeDefinition> {
        self.scopes.get(id)
    }

    /// Looks up a named condition.
    #[must_use]
    pub fn condition(&self, id: &str) -> Option<&FilterExpr> {
        self.conditions.get(id)
    }

    /// Returns true if the scope is registered.
    #[must_use]
    pub fn contains(&self, id: &ScopeId) -> bool {
        self.scopes.contains_key(id)
    }

    /// Returns the number of registered scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Returns true if no scopes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Returns every scope id in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &ScopeId> {
        self.scopes.keys()
    }

    /// Returns `(from, to)` pairs for references to unregistered scopes.
    #[must_use]
    pub fn dangling_references(&self) -> Vec<(&ScopeId, &ScopeId)> {
        self.scopes
            .values()
            .flat_map(|def| {
                def.ast
                    .references()
                    .into_iter()
                    .filter(|target| !self.contains(target))
                    .map(move |target| (&def.id, target))
            })
            .collect()
    }
}
