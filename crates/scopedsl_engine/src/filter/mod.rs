//! Filter evaluation with optional clause breakdown.
//!
//! [`evaluate`] decides whether one candidate passes a [`FilterExpr`]. When
//! the context was built with tracing, it also returns a
//! [`BreakdownNode`] tree recording every clause, including the ones a
//! short-circuit skipped.
//!
//! [`FilterExpr`]: scopedsl_language::FilterExpr

mod breakdown;
mod eval;

pub use breakdown::{BreakdownNode, ClauseStatus, FilterBreakdown};
pub use eval::{evaluate, resolve_var};
