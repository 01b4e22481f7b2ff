//! AST model, filter expressions, parser, and scope registry for the scope DSL.
//!
//! This crate provides:
//! - [`AstNode`] - Typed scope expression tree consumed by the engine
//! - [`FilterExpr`] - JSON-Logic-like boolean filter expressions
//! - [`parse_scope`] - Parser for the scope DSL text form
//! - [`ScopeRegistry`] - Named scopes and reusable named conditions

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod filter;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod span;
pub mod token;

pub use ast::{AstNode, IterationMode, SourceKind};
pub use filter::{CompareOp, FilterExpr};
pub use parser::{Parser, parse_scope};
pub use registry::{ScopeDefinition, ScopeId, ScopeRegistry};
pub use span::Span;
