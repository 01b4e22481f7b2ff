//! Why a candidate did not make it into a result set.
//!
//! Two things drop a candidate: coverage blocking during clothing
//! iteration, and a filter evaluating false. The first is read from the
//! trace, the second from the filter breakdowns.

use scopedsl_engine::{BreakdownNode, FilterBreakdown, ResolutionResult, TraceEvent};
use scopedsl_foundation::EntityId;

// =============================================================================
// Failing Clauses
// =============================================================================

/// Returns the clauses responsible for a false result.
///
/// Walks `and`, `or`, `not` and `condition_ref` nodes down to the
/// clauses that decided the outcome. Short-circuited clauses are never
/// blamed. A failing `not` is itself the culprit, since its child passed.
/// Returns nothing for a clause that passed.
#[must_use]
pub fn explain_failure(node: &BreakdownNode) -> Vec<&BreakdownNode> {
    let mut out = Vec::new();
    collect_failures(node, &mut out);
    out
}

fn collect_failures<'n>(node: &'n BreakdownNode, out: &mut Vec<&'n BreakdownNode>) {
    if node.result || node.is_short_circuited() {
        return;
    }
    let evaluated = node.children.iter().filter(|c| !c.is_short_circuited());
    match node.kind {
        "and" | "or" => {
            for child in evaluated {
                collect_failures(child, out);
            }
        }
        "condition_ref" if !node.children.is_empty() => {
            for child in evaluated {
                collect_failures(child, out);
            }
        }
        _ => out.push(node),
    }
}

/// One-line description of why a candidate failed its filter.
#[must_use]
pub fn summarize_failure(breakdown: &FilterBreakdown) -> Option<String> {
    let failing = explain_failure(&breakdown.root);
    if failing.is_empty() {
        return None;
    }
    let clauses: Vec<_> = failing.iter().map(|n| n.description.as_str()).collect();
    Some(format!(
        "{} rejected: {}",
        breakdown.candidate,
        clauses.join("; ")
    ))
}

// =============================================================================
// Exclusions
// =============================================================================

/// Why a candidate was dropped.
#[derive(Clone, Debug, PartialEq)]
pub enum ExclusionReason {
    /// Another item covers it.
    Hidden {
        /// Where it was hidden.
        reason: String,
        /// The covering item, when known.
        blocked_by: Option<EntityId>,
    },

    /// A filter evaluated false.
    FilterRejected {
        /// The rendered filter.
        expr: String,
        /// Descriptions of the clauses that failed.
        failing: Vec<String>,
    },
}

/// A dropped candidate and the reason.
#[derive(Clone, Debug, PartialEq)]
pub struct Exclusion {
    /// Label of the candidate.
    pub item: String,
    /// Why it was dropped.
    pub reason: ExclusionReason,
}

/// Lists every candidate a traced resolution dropped.
///
/// Hidden items come first in trace order, then filter rejections in
/// evaluation order. An untraced result yields nothing.
#[must_use]
pub fn exclusions(result: &ResolutionResult) -> Vec<Exclusion> {
    let mut out = Vec::new();

    if let Some(trace) = &result.trace {
        for record in trace.iter() {
            if let TraceEvent::CandidateSkipped {
                item,
                reason,
                blocked_by,
            } = &record.event
            {
                out.push(Exclusion {
                    item: item.clone(),
                    reason: ExclusionReason::Hidden {
                        reason: reason.clone(),
                        blocked_by: blocked_by.clone(),
                    },
                });
            }
        }
    }

    for breakdown in result.breakdowns.iter().filter(|b| !b.passed()) {
        out.push(Exclusion {
            item: breakdown.candidate.clone(),
            reason: ExclusionReason::FilterRejected {
                expr: breakdown.expr.clone(),
                failing: explain_failure(&breakdown.root)
                    .into_iter()
                    .map(|n| n.description.clone())
                    .collect(),
            },
        });
    }

    out
}
