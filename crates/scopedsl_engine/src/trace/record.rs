//! Trace event and record types.

use scopedsl_foundation::{EntityId, ErrorCode};

// =============================================================================
// Trace Event
// =============================================================================

/// Steps recorded during resolution.
#[derive(Clone, Debug, PartialEq)]
pub enum TraceEvent {
    /// Resolution of a named scope began.
    ScopeEnter {
        /// The scope id.
        scope: String,
    },

    /// Resolution of a named scope finished.
    ScopeExit {
        /// The scope id.
        scope: String,
        /// Number of results, zero on failure.
        result_count: usize,
        /// Whether the scope resolved without a fatal error.
        success: bool,
    },

    /// An AST node produced its result set.
    NodeResolved {
        /// The node kind.
        node: &'static str,
        /// Number of results.
        result_count: usize,
    },

    /// A candidate was kept.
    CandidateIncluded {
        /// Label of the candidate.
        item: String,
        /// Equipment slot, for clothing candidates.
        slot: Option<String>,
        /// Equipment layer, for clothing candidates.
        layer: Option<String>,
    },

    /// A candidate was dropped.
    CandidateSkipped {
        /// Label of the candidate.
        item: String,
        /// Why it was dropped.
        reason: String,
        /// The item hiding it, for coverage blocking.
        blocked_by: Option<EntityId>,
    },

    /// A filter was evaluated against a candidate.
    FilterEvaluated {
        /// Label of the candidate.
        candidate: String,
        /// The filter outcome.
        passed: bool,
    },

    /// An error was recorded.
    Error {
        /// Stable error code.
        code: ErrorCode,
        /// Rendered message.
        message: String,
        /// Whether resolution continued.
        recoverable: bool,
    },
}

impl TraceEvent {
    /// Returns a short name for the event type.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ScopeEnter { .. } => "scope-enter",
            Self::ScopeExit { .. } => "scope-exit",
            Self::NodeResolved { .. } => "node-resolved",
            Self::CandidateIncluded { .. } => "candidate-included",
            Self::CandidateSkipped { .. } => "candidate-skipped",
            Self::FilterEvaluated { .. } => "filter-evaluated",
            Self::Error { .. } => "error",
        }
    }

    /// Returns true for include/skip decisions.
    #[must_use]
    pub fn is_decision(&self) -> bool {
        matches!(
            self,
            Self::CandidateIncluded { .. } | Self::CandidateSkipped { .. } | Self::FilterEvaluated { .. }
        )
    }

    /// Returns false for skipped candidates, failed filters, failed scopes and errors.
    #[must_use]
    pub fn passed(&self) -> bool {
        match self {
            Self::ScopeEnter { .. } | Self::NodeResolved { .. } | Self::CandidateIncluded { .. } => {
                true
            }
            Self::ScopeExit { success, .. } => *success,
            Self::FilterEvaluated { passed, .. } => *passed,
            Self::CandidateSkipped { .. } | Self::Error { .. } => false,
        }
    }
}

// =============================================================================
// Trace Record
// =============================================================================

/// A trace event with its position in the resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceRecord {
    /// Sequence number within the resolution.
    pub id: u64,
    /// Dispatcher depth when the event happened.
    pub depth: usize,
    /// The event.
    pub event: TraceEvent,
}

impl TraceRecord {
    /// Creates a new record.
    #[must_use]
    pub fn new(id: u64, depth: usize, event: TraceEvent) -> Self {
        Self { id, depth, event }
    }

    /// Returns the event type name.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        self.event.event_type()
    }
}
