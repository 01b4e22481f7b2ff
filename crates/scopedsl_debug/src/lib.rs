//! Diagnostic export for scope DSL resolutions.
//!
//! This crate provides:
//! - [`HumanFormatter`] - Indented text with pass/fail glyphs
//! - [`JsonFormatter`] - Machine-readable output via `serde_json`
//! - [`explain_failure`] and [`exclusions`] - Why a candidate was dropped
//! - [`ExportConfig`] - Output settings

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod explain;
pub mod format;

pub use config::ExportConfig;
pub use explain::{Exclusion, ExclusionReason, exclusions, explain_failure, summarize_failure};
pub use format::{FAIL, HumanFormatter, JsonFormatter, PASS, SKIPPED, TraceFormatter};
