//! The dispatcher.
//!
//! [`resolve`] is the only entry into node evaluation: it checks the depth
//! limit, matches on the node kind and hands off to the resolver for that
//! kind. Nothing else recurses into the tree.

use std::sync::Arc;

use scopedsl_foundation::{EntityId, Error, Result, Value};
use scopedsl_language::{AstNode, FilterExpr, IterationMode, SourceKind};
use tracing::trace;

use crate::clothing::{CoverageAnalysis, Decision, Equipment, iterate};
use crate::config::CoverageFailurePolicy;
use crate::context::EvaluationContext;
use crate::filter::{FilterBreakdown, evaluate};
use crate::reference::resolve_reference;
use crate::result::{ClothingAccess, Item, ResultSet};
use crate::trace::TraceEvent;

const COMPONENT: &str = "dispatcher";

/// Resolves a node to its result set.
///
/// # Errors
/// Returns the first fatal error: a malformed node, a missing or cyclic
/// scope reference, or nesting past the depth limit. Recoverable errors are
/// recorded in the context and do not stop resolution.
pub fn resolve(node: &AstNode, ctx: &mut EvaluationContext<'_>) -> Result<ResultSet> {
    ctx.enter()?;
    let result = dispatch(node, ctx);
    if let Ok(set) = &result {
        ctx.record(|| TraceEvent::NodeResolved {
            node: node.kind_name(),
            result_count: set.len(),
        });
    }
    ctx.exit();
    result
}

fn dispatch(node: &AstNode, ctx: &mut EvaluationContext<'_>) -> Result<ResultSet> {
    match node {
        AstNode::Source(kind) => source(kind, ctx),
        AstNode::PropertyAccess { parent, field } => {
            let parents = resolve(parent, ctx)?;
            property(&parents, field, ctx)
        }
        AstNode::ArrayIteration { parent } => {
            let parents = resolve(parent, ctx)?;
            expand(&parents, ctx)
        }
        AstNode::Filter { parent, expr } => {
            let parents = resolve(parent, ctx)?;
            filter(parents, expr, ctx)
        }
        AstNode::Union { left, right } => {
            let left = resolve(left, ctx)?;
            let right = resolve(right, ctx)?;
            Ok(left.union(right))
        }
        AstNode::ScopeReference(id) => resolve_reference(id, ctx),
    }
}

// =============================================================================
// Sources
// =============================================================================

fn source(kind: &SourceKind, ctx: &mut EvaluationContext<'_>) -> Result<ResultSet> {
    match kind {
        SourceKind::Actor => Ok(ResultSet::single(Item::entity(ctx.actor().clone()))),
        SourceKind::Location => Ok(ctx
            .location()
            .map(|location| ResultSet::single(Item::entity(location)))
            .unwrap_or_default()),
        SourceKind::Entities { component, negated } => {
            if component.is_empty() {
                let error = Error::malformed_ast("entities() needs a component type");
                return Err(ctx.report(error, COMPONENT));
            }
            let gateway = ctx.gateway();
            let ids: Vec<EntityId> = if *negated {
                gateway
                    .entity_ids()
                    .into_iter()
                    .filter(|id| !gateway.has_component(id, component))
                    .collect()
            } else {
                gateway.entities_with_component(component)
            };
            Ok(ids.into_iter().map(Item::entity).collect())
        }
    }
}

// =============================================================================
// Property access
// =============================================================================

fn property(
    parents: &ResultSet,
    field: &Arc<str>,
    ctx: &mut EvaluationContext<'_>,
) -> Result<ResultSet> {
    if field.is_empty() {
        return Err(ctx.report(Error::malformed_ast("empty field name"), COMPONENT));
    }

    let gateway = ctx.gateway();
    let mut out = ResultSet::new();
    for item in parents {
        match item {
            Item::Clothing(access) => expand_clothing(access, Some(&**field), ctx, &mut out)?,
            Item::Components(entity) => {
                if let Some(value) = gateway.get_component(entity, field) {
                    out.insert(Item::Value(value));
                }
            }
            Item::Value(Value::Map(map)) => {
                if let Some(value) = map.get(&**field).filter(|v| !v.is_null()) {
                    out.insert(Item::Value(value.clone()));
                }
            }
            Item::Value(_) => {
                if let Some(entity) = item.as_entity() {
                    if let Some(found) = entity_field(entity, field, ctx) {
                        out.insert(found);
                    }
                }
            }
        }
    }
    Ok(out)
}

/// A field on an entity: `id`, `components`, a clothing accessor or a
/// component type.
fn entity_field(entity: EntityId, field: &str, ctx: &EvaluationContext<'_>) -> Option<Item> {
    match field {
        "id" => Some(Item::Value(Value::from(entity.as_str()))),
        "components" => Some(Item::Components(entity)),
        _ => {
            if let Some(mode) = IterationMode::from_field(field) {
                return Some(Item::Clothing(ClothingAccess {
                    owner: entity,
                    mode,
                }));
            }
            if field.contains(':') {
                return ctx.gateway().get_component(&entity, field).map(Item::Value);
            }
            None
        }
    }
}

// =============================================================================
// Array iteration
// =============================================================================

fn expand(parents: &ResultSet, ctx: &mut EvaluationContext<'_>) -> Result<ResultSet> {
    let mut out = ResultSet::new();
    for item in parents {
        match item {
            Item::Value(Value::List(list)) => {
                out.extend(list.iter().filter(|v| !v.is_null()).cloned().map(Item::Value));
            }
            Item::Clothing(access) => expand_clothing(access, None, ctx, &mut out)?,
            other => {
                out.insert(other.clone());
            }
        }
    }
    Ok(out)
}

/// Emits the candidates of a clothing accessor, optionally for one slot.
///
/// Coverage is analysed once per accessor, and only for the topmost modes.
/// Malformed equipment or coverage data is reported; it aborts resolution
/// only under [`CoverageFailurePolicy::Strict`].
fn expand_clothing(
    access: &ClothingAccess,
    slot: Option<&str>,
    ctx: &mut EvaluationContext<'_>,
    out: &mut ResultSet,
) -> Result<()> {
    let mode = ctx.mode_override().unwrap_or(access.mode);
    let policy = ctx.config().coverage_failure;
    let gateway = ctx.gateway();

    let (equipment, mut problems) = Equipment::load(gateway, &access.owner);
    let analysis = mode.applies_coverage().then(|| {
        let analysis = CoverageAnalysis::analyze(&equipment, gateway, policy);
        problems.extend(analysis.errors().iter().cloned());
        analysis
    });
    for problem in problems {
        let error = ctx.report(problem, "coverage");
        if policy == CoverageFailurePolicy::Strict {
            return Err(error);
        }
    }

    for decision in iterate(&equipment, mode, slot, analysis.as_ref()) {
        match decision {
            Decision::Include(candidate) => {
                trace!(item = %candidate.item, slot = %candidate.slot, layer = %candidate.layer, "candidate included");
                ctx.record(|| TraceEvent::CandidateIncluded {
                    item: candidate.item.to_string(),
                    slot: Some(candidate.slot.to_string()),
                    layer: Some(candidate.layer.to_string()),
                });
                out.insert(Item::entity(candidate.item));
            }
            Decision::Skip { entry, blocked_by } => {
                trace!(item = %entry.item, slot = %entry.slot, "candidate hidden by coverage");
                ctx.record(|| TraceEvent::CandidateSkipped {
                    item: entry.item.to_string(),
                    reason: format!("hidden at {}/{}", entry.slot, entry.layer),
                    blocked_by,
                });
            }
        }
    }
    Ok(())
}

// =============================================================================
// Filters
// =============================================================================

fn filter(
    parents: ResultSet,
    expr: &FilterExpr,
    ctx: &mut EvaluationContext<'_>,
) -> Result<ResultSet> {
    let candidates = parents.into_items().into_iter().flat_map(|item| match item {
        Item::Value(Value::List(list)) => list.iter().cloned().map(Item::Value).collect::<Vec<_>>(),
        other => vec![other],
    });

    let mut out = ResultSet::new();
    for candidate in candidates {
        let previous = ctx.set_current(Some(candidate.clone()));
        let evaluated = evaluate(expr, &candidate, ctx);
        ctx.set_current(previous);
        let (passed, breakdown) = evaluated?;

        ctx.record(|| TraceEvent::FilterEvaluated {
            candidate: candidate.label(),
            passed,
        });
        if let Some(root) = breakdown {
            ctx.record_breakdown(FilterBreakdown {
                candidate: candidate.label(),
                expr: expr.to_string(),
                root,
            });
        }
        if passed {
            out.insert(candidate);
        }
    }
    Ok(out)
}
