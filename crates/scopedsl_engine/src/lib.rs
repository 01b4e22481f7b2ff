//! Scope resolution engine for the scope DSL.
//!
//! This crate provides:
//! - [`ScopeEngine`] - Entry point resolving a scope id or AST for an actor
//! - [`resolve`] - The dispatcher, total over [`AstNode`](scopedsl_language::AstNode)
//! - [`CoverageAnalysis`] - Which equipped items are hidden by others
//! - [`evaluate`] - Filter evaluation with optional clause breakdown
//! - [`TraceBuffer`] and [`ErrorHandler`] - Bounded diagnostics

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod clothing;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod engine;
pub mod filter;
pub mod reference;
pub mod resolver;
pub mod result;
pub mod trace;

pub use clothing::{
    COVERAGE_COMPONENT, Candidate, CoverageAnalysis, CoverageTier, EQUIPMENT_COMPONENT,
    Equipment, Layer,
};
pub use config::{CoverageFailurePolicy, DEFAULT_MAX_DEPTH, EngineConfig, ResolveOptions};
pub use context::EvaluationContext;
pub use diagnostics::{Diagnostic, ErrorHandler};
pub use engine::{ResolveTarget, ScopeEngine};
pub use filter::{BreakdownNode, ClauseStatus, FilterBreakdown, evaluate};
pub use reference::resolve_reference;
pub use resolver::resolve;
pub use result::{ClothingAccess, Item, ResolutionResult, ResultSet};
pub use trace::{TraceBuffer, TraceBufferStats, TraceEvent, TraceRecord};
