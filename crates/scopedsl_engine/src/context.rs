//! Per-call evaluation state.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use regex::Regex;
use scopedsl_foundation::{EntityId, Error, Result};
use scopedsl_language::{IterationMode, ScopeId, ScopeRegistry};
use scopedsl_storage::EntityGateway;
use tracing::debug;

use crate::config::{EngineConfig, ResolveOptions};
use crate::diagnostics::{Diagnostic, ErrorHandler};
use crate::filter::FilterBreakdown;
use crate::result::Item;
use crate::trace::{TraceBuffer, TraceEvent};

/// Component holding an entity's position: `{ locationId: id }`.
pub const POSITION_COMPONENT: &str = "core:position";

/// State threaded through one resolution.
///
/// A context is created per `resolve` call and never shared between calls.
/// The scope chain is a persistent vector: entering a reference saves the
/// current chain and restores it on the way out, so sibling branches never
/// see each other's entries.
pub struct EvaluationContext<'a> {
    actor: EntityId,
    current: Option<Item>,
    gateway: &'a dyn EntityGateway,
    registry: Option<&'a ScopeRegistry>,
    config: &'a EngineConfig,
    max_depth: usize,
    mode_override: Option<IterationMode>,
    chain: im::Vector<ScopeId>,
    conditions: Vec<Arc<str>>,
    depth: usize,
    trace: Option<TraceBuffer>,
    breakdowns: Option<VecDeque<FilterBreakdown>>,
    dropped_breakdowns: usize,
    errors: ErrorHandler,
    regex_cache: HashMap<Arc<str>, std::result::Result<Regex, String>>,
    quiet: usize,
}

impl<'a> EvaluationContext<'a> {
    /// Creates a context for the actor with default options.
    #[must_use]
    pub fn new(actor: EntityId, gateway: &'a dyn EntityGateway, config: &'a EngineConfig) -> Self {
        Self {
            actor,
            current: None,
            gateway,
            registry: None,
            config,
            max_depth: config.max_depth,
            mode_override: None,
            chain: im::Vector::new(),
            conditions: Vec::new(),
            depth: 0,
            trace: None,
            breakdowns: None,
            dropped_breakdowns: 0,
            errors: ErrorHandler::new(config.diagnostic_capacity),
            regex_cache: HashMap::new(),
            quiet: 0,
        }
    }

    /// Builder method to attach a scope registry.
    #[must_use]
    pub fn with_registry(mut self, registry: &'a ScopeRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Builder method to apply per-call options.
    ///
    /// Trace and breakdown storage is only allocated here, when requested.
    #[must_use]
    pub fn with_options(mut self, options: &ResolveOptions) -> Self {
        self.max_depth = options.max_depth.unwrap_or(self.config.max_depth);
        self.mode_override = options.iteration_mode_override;
        if options.trace {
            self.trace = Some(TraceBuffer::new(self.config.trace_capacity));
            self.breakdowns = Some(VecDeque::new());
        }
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the querying entity.
    #[must_use]
    pub fn actor(&self) -> &EntityId {
        &self.actor
    }

    /// Returns the candidate currently being filtered, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Item> {
        self.current.as_ref()
    }

    /// Replaces the current candidate, returning the previous one.
    pub fn set_current(&mut self, item: Option<Item>) -> Option<Item> {
        std::mem::replace(&mut self.current, item)
    }

    /// Returns the entity gateway.
    #[must_use]
    pub fn gateway(&self) -> &'a dyn EntityGateway {
        self.gateway
    }

    /// Returns the scope registry, if one was supplied.
    #[must_use]
    pub fn registry(&self) -> Option<&'a ScopeRegistry> {
        self.registry
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &'a EngineConfig {
        self.config
    }

    /// Returns the forced iteration mode, if any.
    #[must_use]
    pub fn mode_override(&self) -> Option<IterationMode> {
        self.mode_override
    }

    /// Returns the current nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the depth limit in force.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns true if a trace is being recorded.
    #[must_use]
    pub fn is_tracing(&self) -> bool {
        self.trace.is_some()
    }

    /// Returns the actor's location, read from its position component.
    #[must_use]
    pub fn location(&self) -> Option<EntityId> {
        self.gateway
            .get_component(&self.actor, POSITION_COMPONENT)?
            .get("locationId")?
            .to_entity_id()
    }

    // =========================================================================
    // Depth and scope chain
    // =========================================================================

    /// Enters one level of nesting.
    ///
    /// # Errors
    /// Returns `DepthExceeded` if the limit would be passed.
    pub fn enter(&mut self) -> Result<()> {
        if self.depth >= self.max_depth {
            let error = Error::depth_exceeded(self.depth + 1, self.max_depth, self.chain_names());
            return Err(self.report(error, "dispatcher"));
        }
        self.depth += 1;
        Ok(())
    }

    /// Leaves one level of nesting.
    pub fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Returns the active chain of scope references, outermost first.
    #[must_use]
    pub fn chain(&self) -> &im::Vector<ScopeId> {
        &self.chain
    }

    /// Returns the chain as strings.
    #[must_use]
    pub fn chain_names(&self) -> Vec<String> {
        self.chain.iter().map(ToString::to_string).collect()
    }

    /// Appends a scope to the chain, returning the chain to restore later.
    pub fn push_scope(&mut self, id: ScopeId) -> im::Vector<ScopeId> {
        let saved = self.chain.clone();
        self.chain.push_back(id);
        saved
    }

    /// Restores a chain saved by [`push_scope`](Self::push_scope).
    pub fn restore_chain(&mut self, saved: im::Vector<ScopeId>) {
        self.chain = saved;
    }

    /// Returns the named conditions currently being evaluated.
    #[must_use]
    pub(crate) fn conditions(&self) -> &[Arc<str>] {
        &self.conditions
    }

    pub(crate) fn push_condition(&mut self, id: Arc<str>) {
        self.conditions.push(id);
    }

    pub(crate) fn pop_condition(&mut self) {
        self.conditions.pop();
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Records an error and returns it with context attached.
    ///
    /// During speculative evaluation nothing is recorded.
    pub fn report(&mut self, error: Error, component: &str) -> Error {
        if self.quiet > 0 {
            return error;
        }
        let chain: Vec<ScopeId> = self.chain.iter().cloned().collect();
        let error = self.errors.handle(error, component, &chain);
        let depth = self.depth;
        if let Some(trace) = self.trace.as_mut() {
            trace.push(
                depth,
                TraceEvent::Error {
                    code: error.code(),
                    message: error.kind.to_string(),
                    recoverable: error.is_recoverable(),
                },
            );
        }
        error
    }

    /// Appends a trace event when tracing. The event is only built if it
    /// will be kept.
    pub fn record<F>(&mut self, event: F)
    where
        F: FnOnce() -> TraceEvent,
    {
        if self.quiet > 0 {
            return;
        }
        let depth = self.depth;
        if let Some(trace) = self.trace.as_mut() {
            trace.push(depth, event());
        }
    }

    /// Returns true if filter breakdowns should be built.
    #[must_use]
    pub fn wants_breakdown(&self) -> bool {
        self.breakdowns.is_some()
    }

    /// Stores a filter breakdown when tracing.
    ///
    /// At most `trace_capacity` breakdowns are kept; the oldest go first.
    pub fn record_breakdown(&mut self, breakdown: FilterBreakdown) {
        if let Some(breakdowns) = self.breakdowns.as_mut() {
            breakdowns.push_back(breakdown);
            while breakdowns.len() > self.config.trace_capacity {
                breakdowns.pop_front();
                self.dropped_breakdowns += 1;
            }
        }
    }

    /// Returns the number of breakdowns dropped to stay within capacity.
    #[must_use]
    pub fn dropped_breakdowns(&self) -> usize {
        self.dropped_breakdowns
    }

    /// Runs `f` without recording errors or trace events.
    pub(crate) fn speculate<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.quiet += 1;
        let result = f(self);
        self.quiet -= 1;
        result
    }

    /// Returns the compiled regex for a pattern, compiling it once per call.
    pub(crate) fn regex(&mut self, pattern: &Arc<str>) -> std::result::Result<Regex, String> {
        self.regex_cache
            .entry(pattern.clone())
            .or_insert_with(|| Regex::new(pattern).map_err(|e| e.to_string()))
            .clone()
    }

    /// Consumes the context, returning the trace, breakdowns and diagnostics.
    #[must_use]
    pub fn finish(self) -> (Option<TraceBuffer>, Vec<FilterBreakdown>, Vec<Diagnostic>) {
        if self.dropped_breakdowns > 0 {
            debug!(dropped = self.dropped_breakdowns, "filter breakdowns over capacity");
        }
        (
            self.trace,
            self.breakdowns.map(Vec::from).unwrap_or_default(),
            self.errors.into_vec(),
        )
    }
}
