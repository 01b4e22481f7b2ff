//! Integration tests across all layers
//!
//! End-to-end scenarios: registry setup, resolution, coverage, and
//! diagnostic export.

mod concurrency;
mod properties;
