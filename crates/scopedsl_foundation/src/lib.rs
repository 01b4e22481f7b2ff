//! Core values, entity identifiers, and errors for the scope DSL engine.
//!
//! This crate provides:
//! - [`Value`] - JSON-like component data and scalar results
//! - [`EntityId`] - Opaque, cheaply cloneable entity identifiers
//! - [`Error`] - Rich error types with stable [`ErrorCode`]s and context
//! - Persistent collections ([`LtVec`], [`LtMap`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod entity;
pub mod error;
pub mod value;

pub use collections::{LtMap, LtVec};
pub use entity::EntityId;
pub use error::{Error, ErrorCode, ErrorContext, ErrorKind};
pub use value::Value;

/// Result type for scope DSL operations.
pub type Result<T> = std::result::Result<T, Error>;
