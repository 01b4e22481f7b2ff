//! Engine and per-call configuration.

use scopedsl_language::IterationMode;

/// Default limit on nested resolution depth.
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// What happens to an item whose coverage metadata cannot be read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CoverageFailurePolicy {
    /// The item is treated as accessible and the error is recorded.
    #[default]
    FailOpen,
    /// The item is treated as blocked and the error is recorded.
    FailClosed,
    /// The error aborts the resolution.
    Strict,
}

/// Engine-wide settings shared by every resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum nesting of dispatcher calls, including scope references.
    pub max_depth: usize,
    /// Maximum records kept by a trace buffer, and maximum filter
    /// breakdowns kept per resolution.
    pub trace_capacity: usize,
    /// Maximum diagnostics kept per resolution.
    pub diagnostic_capacity: usize,
    /// Handling of malformed coverage metadata.
    pub coverage_failure: CoverageFailurePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            trace_capacity: 1024,
            diagnostic_capacity: 256,
            coverage_failure: CoverageFailurePolicy::FailOpen,
        }
    }
}

impl EngineConfig {
    /// Settings for live play: lenient about bad content.
    #[must_use]
    pub fn gameplay() -> Self {
        Self::default()
    }

    /// Settings for content validation: bad metadata is an error.
    #[must_use]
    pub fn validation() -> Self {
        Self {
            trace_capacity: 16_384,
            diagnostic_capacity: 4096,
            coverage_failure: CoverageFailurePolicy::Strict,
            ..Self::default()
        }
    }

    /// Builder method to set the depth limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builder method to set the trace capacity.
    #[must_use]
    pub fn with_trace_capacity(mut self, capacity: usize) -> Self {
        self.trace_capacity = capacity;
        self
    }

    /// Builder method to set the diagnostic capacity.
    #[must_use]
    pub fn with_diagnostic_capacity(mut self, capacity: usize) -> Self {
        self.diagnostic_capacity = capacity;
        self
    }

    /// Builder method to set the coverage failure policy.
    #[must_use]
    pub fn with_coverage_failure(mut self, policy: CoverageFailurePolicy) -> Self {
        self.coverage_failure = policy;
        self
    }
}

/// Options for a single `resolve` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Record a trace and filter breakdowns.
    pub trace: bool,
    /// Overrides [`EngineConfig::max_depth`] for this call.
    pub max_depth: Option<usize>,
    /// Forces every clothing iteration to use this mode.
    pub iteration_mode_override: Option<IterationMode>,
}

impl ResolveOptions {
    /// Creates default options: no trace, engine depth limit, no override.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options with tracing enabled.
    #[must_use]
    pub fn traced() -> Self {
        Self {
            trace: true,
            ..Self::default()
        }
    }

    /// Builder method to enable or disable tracing.
    #[must_use]
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Builder method to set the depth limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Builder method to force an iteration mode.
    #[must_use]
    pub fn with_iteration_mode(mut self, mode: IterationMode) -> Self {
        self.iteration_mode_override = Some(mode);
        self
    }
}
