//! Error types for scope resolution.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Every [`ErrorKind`] maps to a stable [`ErrorCode`] so tooling can match
//! on codes rather than message text.

use std::fmt;

use thiserror::Error;

use crate::entity::EntityId;

/// The main error type for scope DSL operations.
#[derive(Clone, Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Returns the stable code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    /// Returns true if resolution may continue after this error.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.code().is_recoverable()
    }

    /// Creates a missing context error.
    #[must_use]
    pub fn missing_context(what: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingContext(what.into()))
    }

    /// Creates a malformed AST error.
    #[must_use]
    pub fn malformed_ast(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedAst(message.into()))
    }

    /// Creates a scope not found error.
    #[must_use]
    pub fn scope_not_found(scope: impl Into<String>) -> Self {
        Self::new(ErrorKind::ScopeNotFound(scope.into()))
    }

    /// Creates a reference cycle error carrying the full chain.
    #[must_use]
    pub fn cycle_detected(chain: Vec<String>) -> Self {
        Self::new(ErrorKind::CycleDetected { chain })
    }

    /// Creates a depth exceeded error.
    #[must_use]
    pub fn depth_exceeded(depth: usize, limit: usize, chain: Vec<String>) -> Self {
        Self::new(ErrorKind::DepthExceeded {
            depth,
            limit,
            chain,
        })
    }

    /// Creates an invalid filter pattern error.
    #[must_use]
    pub fn invalid_filter_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidFilterPattern {
            pattern: pattern.into(),
            message: message.into(),
        })
    }

    /// Creates a condition not found error.
    #[must_use]
    pub fn condition_not_found(condition: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConditionNotFound(condition.into()))
    }

    /// Creates a coverage metadata error for an item.
    #[must_use]
    pub fn coverage_metadata(item: EntityId, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CoverageMetadata {
            item,
            message: message.into(),
        })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ErrorKind {
    /// A required collaborator or the actor is absent.
    #[error("missing context: {0}")]
    MissingContext(String),

    /// A node has an invalid shape.
    #[error("malformed AST: {0}")]
    MalformedAst(String),

    /// A referenced scope is not registered.
    #[error("scope not found: {0}")]
    ScopeNotFound(String),

    /// A scope reference chain revisits a scope already being resolved.
    #[error("scope reference cycle: {}", .chain.join(" -> "))]
    CycleDetected {
        /// The ordered chain, ending with the repeated scope.
        chain: Vec<String>,
    },

    /// Resolution nested deeper than the configured limit.
    #[error("resolution depth {depth} exceeds limit {limit}")]
    DepthExceeded {
        /// The depth that was reached.
        depth: usize,
        /// The configured limit.
        limit: usize,
        /// Scope references active when the limit was hit.
        chain: Vec<String>,
    },

    /// A filter clause carries an unusable pattern or operator.
    #[error("invalid filter pattern `{pattern}`: {message}")]
    InvalidFilterPattern {
        /// The offending pattern or operator.
        pattern: String,
        /// Why it was rejected.
        message: String,
    },

    /// A `condition_ref` names an unregistered condition.
    #[error("condition not found: {0}")]
    ConditionNotFound(String),

    /// Coverage metadata on an item could not be interpreted.
    #[error("coverage metadata error on {item}: {message}")]
    CoverageMetadata {
        /// The item whose metadata failed.
        item: EntityId,
        /// Description of the failure.
        message: String,
    },

    /// Scope DSL source text could not be parsed.
    #[error("parse error at {line}:{column}: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Line number (1-indexed).
        line: u32,
        /// Column number (1-indexed).
        column: u32,
    },
}

impl ErrorKind {
    /// Returns the stable code for this kind.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MissingContext(_) => ErrorCode::MissingContext,
            Self::MalformedAst(_) => ErrorCode::MalformedAst,
            Self::ScopeNotFound(_) => ErrorCode::ScopeNotFound,
            Self::CycleDetected { .. } => ErrorCode::CycleDetected,
            Self::DepthExceeded { .. } => ErrorCode::DepthExceeded,
            Self::InvalidFilterPattern { .. } => ErrorCode::InvalidFilterPattern,
            Self::ConditionNotFound(_) => ErrorCode::ConditionNotFound,
            Self::CoverageMetadata { .. } => ErrorCode::CoverageMetadataError,
            Self::Parse { .. } => ErrorCode::Parse,
        }
    }
}

/// Stable error codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCode {
    /// Actor, gateway or registry absent.
    MissingContext,
    /// Invalid node shape.
    MalformedAst,
    /// Referenced scope id not registered.
    ScopeNotFound,
    /// Scope reference cycle.
    CycleDetected,
    /// Resolution depth limit reached.
    DepthExceeded,
    /// Bad regex or operator in a filter clause.
    InvalidFilterPattern,
    /// Unregistered named condition.
    ConditionNotFound,
    /// Uninterpretable coverage metadata on an item.
    CoverageMetadataError,
    /// Unparseable scope DSL text.
    Parse,
}

impl ErrorCode {
    /// Returns the stable string form of this code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingContext => "SCOPE_1001",
            Self::MalformedAst => "SCOPE_1002",
            Self::ScopeNotFound => "SCOPE_1003",
            Self::CycleDetected => "SCOPE_1004",
            Self::DepthExceeded => "SCOPE_1005",
            Self::InvalidFilterPattern => "SCOPE_2001",
            Self::ConditionNotFound => "SCOPE_2002",
            Self::CoverageMetadataError => "SCOPE_3001",
            Self::Parse => "SCOPE_4001",
        }
    }

    /// Returns true if resolution continues after recording this error.
    ///
    /// Structural and context errors abort; data-quality errors on a single
    /// clause or item do not.
    #[must_use]
    pub const fn is_recoverable(self) -> bool {
        matches!(
            self,
            Self::InvalidFilterPattern | Self::ConditionNotFound | Self::CoverageMetadataError
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Context about where an error occurred.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ErrorContext {
    /// The component of the engine that raised the error.
    pub component: Option<String>,
    /// Entity being evaluated.
    pub entity: Option<EntityId>,
    /// Equipment slot, when relevant.
    pub slot: Option<String>,
    /// Equipment layer, when relevant.
    pub layer: Option<String>,
    /// Scope references active at the time, outermost first.
    pub scope_chain: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the originating component.
    #[must_use]
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Sets the entity.
    #[must_use]
    pub fn with_entity(mut self, entity: EntityId) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Sets the slot and layer.
    #[must_use]
    pub fn with_slot(mut self, slot: impl Into<String>, layer: impl Into<String>) -> Self {
        self.slot = Some(slot.into());
        self.layer = Some(layer.into());
        self
    }

    /// Sets the scope chain.
    #[must_use]
    pub fn with_scope_chain(mut self, chain: Vec<String>) -> Self {
        self.scope_chain = chain;
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(component) = &self.component {
            parts.push(format!("in {component}"));
        }
        if let Some(entity) = &self.entity {
            parts.push(format!("entity {entity}"));
        }
        match (&self.slot, &self.layer) {
            (Some(slot), Some(layer)) => parts.push(format!("slot {slot}/{layer}")),
            (Some(slot), None) => parts.push(format!("slot {slot}")),
            _ => {}
        }
        if !self.scope_chain.is_empty() {
            parts.push(format!("via {}", self.scope_chain.join(" -> ")));
        }
        f.write_str(&parts.join(", "))
    }
}
