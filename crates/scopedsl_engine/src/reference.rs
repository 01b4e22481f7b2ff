//! Named scope references.

use scopedsl_foundation::{Error, Result};
use scopedsl_language::ScopeId;
use tracing::debug;

use crate::context::EvaluationContext;
use crate::resolver::resolve;
use crate::result::ResultSet;
use crate::trace::TraceEvent;

const COMPONENT: &str = "reference";

/// Resolves a registered scope by id.
///
/// The id is appended to the context's scope chain for the duration of the
/// call and removed afterwards, whether or not resolution succeeded. Only
/// the references currently on the stack count toward cycle detection, so
/// two sibling branches may use the same scope freely.
///
/// # Errors
/// - `CycleDetected` if the id is already on the chain; the error carries
///   the chain with the repeated id appended
/// - `MissingContext` if the context has no registry
/// - `ScopeNotFound` if the id is not registered
/// - any fatal error from the referenced scope
pub fn resolve_reference(id: &ScopeId, ctx: &mut EvaluationContext<'_>) -> Result<ResultSet> {
    if ctx.chain().contains(id) {
        let mut chain = ctx.chain_names();
        chain.push(id.to_string());
        return Err(ctx.report(Error::cycle_detected(chain), COMPONENT));
    }

    let Some(registry) = ctx.registry() else {
        return Err(ctx.report(Error::missing_context("scope registry"), COMPONENT));
    };
    let Some(definition) = registry.lookup(id) else {
        return Err(ctx.report(Error::scope_not_found(id.as_str()), COMPONENT));
    };

    let saved = ctx.push_scope(id.clone());
    debug!(scope = %id, depth = ctx.depth(), "entering scope");
    ctx.record(|| TraceEvent::ScopeEnter {
        scope: id.to_string(),
    });

    let result = resolve(&definition.ast, ctx);

    ctx.record(|| TraceEvent::ScopeExit {
        scope: id.to_string(),
        result_count: result.as_ref().map_or(0, ResultSet::len),
        success: result.is_ok(),
    });
    debug!(scope = %id, success = result.is_ok(), "leaving scope");
    ctx.restore_chain(saved);
    result
}
