//! Integration tests for Layer 2: Language
//!
//! Tests for the scope DSL parser, filter expressions, and the registry.

mod filters;
mod parser;
mod registry;
