//! Entity gateway interface and in-memory world for the scope DSL engine.
//!
//! This crate provides:
//! - [`EntityGateway`] - Read-only component lookup consumed by the engine
//! - [`World`] - Immutable in-memory component store with structural sharing

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod gateway;
pub mod world;

pub use gateway::EntityGateway;
pub use world::World;
