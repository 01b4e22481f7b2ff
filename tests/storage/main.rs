//! Integration tests for Layer 1: Storage
//!
//! Tests for the in-memory world and the entity gateway contract.

mod gateway;
mod world;
