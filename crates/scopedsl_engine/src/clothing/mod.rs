//! Layered equipment and coverage blocking.
//!
//! Equipment is read from the [`EQUIPMENT_COMPONENT`] of the wearer; each
//! item may carry a [`COVERAGE_COMPONENT`] naming the body areas it covers
//! and its coverage tier. [`CoverageAnalysis`] decides, once per iteration,
//! which items are hidden by others; [`iterate`] expands the equipment in a
//! given mode.

mod coverage;
mod equipment;
mod iterate;

pub use coverage::{CoverageAnalysis, CoverageMetadata};
pub use equipment::{
    COVERAGE_COMPONENT, CoverageTier, EQUIPMENT_COMPONENT, EquippedItem, Equipment, Layer,
};
pub use iterate::{Candidate, Decision, iterate};
