//! Scopedsl - Scope DSL resolution engine
//!
//! This crate re-exports all layers of the Scopedsl system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: scopedsl_debug      - Human-readable and JSON diagnostic export
//! Layer 3: scopedsl_engine     - Resolution, coverage blocking, filters, tracing
//! Layer 2: scopedsl_language   - AST, filter expressions, parser, scope registry
//! Layer 1: scopedsl_storage    - Entity gateway and in-memory world
//! Layer 0: scopedsl_foundation - Core types (Value, EntityId, Error)
//! ```

pub use scopedsl_debug as debug;
pub use scopedsl_engine as engine;
pub use scopedsl_foundation as foundation;
pub use scopedsl_language as language;
pub use scopedsl_storage as storage;

pub use scopedsl_engine::{ResolutionResult, ResolveOptions, ScopeEngine};
pub use scopedsl_foundation::{EntityId, Error, ErrorCode, Result, Value};
pub use scopedsl_language::{AstNode, ScopeRegistry, parse_scope};
pub use scopedsl_storage::{EntityGateway, World};
