//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Value, EntityId, Error, and persistent collections.

mod collections;
mod errors;
mod values;
