//! The resolution entry point.

use scopedsl_foundation::{EntityId, Error};
use scopedsl_language::{AstNode, ScopeId, ScopeRegistry, parse_scope};
use scopedsl_storage::EntityGateway;
use tracing::debug;

use crate::config::{EngineConfig, ResolveOptions};
use crate::context::EvaluationContext;
use crate::diagnostics::Diagnostic;
use crate::reference::resolve_reference;
use crate::resolver::resolve;
use crate::result::ResolutionResult;

/// What to resolve: a registered scope or a standalone tree.
#[derive(Clone, Copy, Debug)]
pub enum ResolveTarget<'t> {
    /// A scope looked up in the registry.
    Scope(&'t ScopeId),
    /// An AST evaluated directly.
    Ast(&'t AstNode),
}

impl<'t> From<&'t ScopeId> for ResolveTarget<'t> {
    fn from(id: &'t ScopeId) -> Self {
        Self::Scope(id)
    }
}

impl<'t> From<&'t AstNode> for ResolveTarget<'t> {
    fn from(ast: &'t AstNode) -> Self {
        Self::Ast(ast)
    }
}

/// Resolves scopes against an entity gateway.
///
/// The engine holds only shared references and configuration. Every call
/// builds its own [`EvaluationContext`], so one engine can serve
/// concurrent resolutions from several threads.
///
/// # Example
///
/// ```
/// use scopedsl_engine::{ResolveOptions, ScopeEngine};
/// use scopedsl_foundation::EntityId;
/// use scopedsl_language::parse_scope;
/// use scopedsl_storage::World;
///
/// let world = World::new().spawn("hero");
/// let engine = ScopeEngine::new(&world);
/// let ast = parse_scope("actor").unwrap();
///
/// let result = engine.resolve(&ast, &EntityId::new("hero"), &ResolveOptions::new());
/// assert_eq!(result.entities(), vec![EntityId::new("hero")]);
/// ```
pub struct ScopeEngine<'a> {
    gateway: &'a dyn EntityGateway,
    registry: Option<&'a ScopeRegistry>,
    config: EngineConfig,
}

impl<'a> ScopeEngine<'a> {
    /// Creates an engine with the default configuration and no registry.
    #[must_use]
    pub fn new(gateway: &'a dyn EntityGateway) -> Self {
        Self {
            gateway,
            registry: None,
            config: EngineConfig::default(),
        }
    }

    /// Builder method to attach a scope registry.
    #[must_use]
    pub fn with_registry(mut self, registry: &'a ScopeRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Builder method to replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolves a scope id or AST for an actor.
    ///
    /// Never panics on bad input: fatal errors end up in
    /// [`ResolutionResult::outcome`], with the trace and diagnostics
    /// gathered up to that point.
    pub fn resolve<'t>(
        &self,
        target: impl Into<ResolveTarget<'t>>,
        actor: &EntityId,
        options: &ResolveOptions,
    ) -> ResolutionResult {
        let target = target.into();
        let mut ctx =
            EvaluationContext::new(actor.clone(), self.gateway, &self.config).with_options(options);
        if let Some(registry) = self.registry {
            ctx = ctx.with_registry(registry);
        }

        let outcome = if actor.is_empty() {
            Err(ctx.report(Error::missing_context("no actor given"), "engine"))
        } else {
            match target {
                ResolveTarget::Scope(id) => resolve_reference(id, &mut ctx),
                ResolveTarget::Ast(ast) => resolve(ast, &mut ctx),
            }
        };

        match &outcome {
            Ok(set) => debug!(actor = %actor, results = set.len(), "scope resolved"),
            Err(error) => debug!(actor = %actor, code = %error.code(), %error, "scope resolution failed"),
        }

        let (trace, breakdowns, diagnostics) = ctx.finish();
        ResolutionResult {
            outcome,
            trace,
            breakdowns,
            diagnostics,
        }
    }

    /// Parses scope source text and resolves it.
    ///
    /// A parse error is returned as the outcome, with a matching diagnostic.
    pub fn resolve_source(
        &self,
        source: &str,
        actor: &EntityId,
        options: &ResolveOptions,
    ) -> ResolutionResult {
        match parse_scope(source) {
            Ok(ast) => self.resolve(&ast, actor, options),
            Err(error) => ResolutionResult {
                diagnostics: vec![Diagnostic::from_error(&error)],
                outcome: Err(error),
                trace: None,
                breakdowns: Vec::new(),
            },
        }
    }
}
