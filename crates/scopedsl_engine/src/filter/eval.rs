//! Filter evaluation.

use std::sync::Arc;

use scopedsl_foundation::{EntityId, Error, Result, Value};
use scopedsl_language::{CompareOp, FilterExpr};

use super::breakdown::BreakdownNode;
use crate::context::EvaluationContext;
use crate::result::Item;

const COMPONENT: &str = "filter";

/// Evaluates a filter against a candidate.
///
/// Returns the outcome and, when the context wants breakdowns, the clause
/// tree. Recoverable problems (unknown operators, bad patterns, missing
/// conditions) are reported and make their clause false.
///
/// # Errors
/// Returns `CycleDetected` if named conditions refer to each other in a loop.
pub fn evaluate(
    expr: &FilterExpr,
    candidate: &Item,
    ctx: &mut EvaluationContext<'_>,
) -> Result<(bool, Option<BreakdownNode>)> {
    let mut evaluator = Evaluator {
        candidate,
        build: ctx.wants_breakdown(),
    };
    let outcome = evaluator.clause(expr, ctx)?;
    Ok((outcome.result, outcome.node))
}

struct Outcome {
    result: bool,
    node: Option<BreakdownNode>,
}

struct Evaluator<'c> {
    candidate: &'c Item,
    build: bool,
}

impl Evaluator<'_> {
    fn node(&self, expr: &FilterExpr, result: bool) -> Option<BreakdownNode> {
        self.build
            .then(|| BreakdownNode::new(expr.kind_name(), expr.to_string(), result))
    }

    fn clause(&mut self, expr: &FilterExpr, ctx: &mut EvaluationContext<'_>) -> Result<Outcome> {
        match expr {
            FilterExpr::Literal(_) | FilterExpr::Var(_) => {
                let (value, node) = self.operand(expr, ctx)?;
                Ok(Outcome {
                    result: value.is_truthy(),
                    node,
                })
            }

            FilterExpr::Compare { op, left, right } => {
                let (l, left_node) = self.operand(left, ctx)?;
                let (r, right_node) = self.operand(right, ctx)?;
                let result = compare(*op, &l, &r);
                Ok(Outcome {
                    result,
                    node: self.node(expr, result).map(|n| {
                        n.with_children(left_node.into_iter().chain(right_node).collect())
                    }),
                })
            }

            FilterExpr::And(items) => self.junction(expr, items, false, ctx),
            FilterExpr::Or(items) => self.junction(expr, items, true, ctx),

            FilterExpr::Not(inner) => {
                let inner = self.clause(inner, ctx)?;
                let result = !inner.result;
                Ok(Outcome {
                    result,
                    node: self
                        .node(expr, result)
                        .map(|n| n.with_children(inner.node.into_iter().collect())),
                })
            }

            FilterExpr::In { needle, haystack } => {
                let (n, needle_node) = self.operand(needle, ctx)?;
                let (h, haystack_node) = self.operand(haystack, ctx)?;
                let result = match (&h, &n) {
                    (Value::List(list), _) => list.iter().any(|v| v.strict_eq(&n)),
                    (Value::String(hay), Value::String(needle)) => hay.contains(&**needle),
                    _ => false,
                };
                Ok(Outcome {
                    result,
                    node: self.node(expr, result).map(|node| {
                        node.with_children(needle_node.into_iter().chain(haystack_node).collect())
                    }),
                })
            }

            FilterExpr::ComponentPresent { target, component } => {
                let entity = resolve_var(target, self.candidate, ctx).to_entity_id();
                let result = entity
                    .as_ref()
                    .is_some_and(|e| ctx.gateway().has_component(e, component));
                Ok(Outcome {
                    result,
                    node: self.node(expr, result).map(|n| {
                        n.with_value(entity.map_or(Value::Null, Value::EntityRef))
                    }),
                })
            }

            FilterExpr::ConditionRef(id) => self.condition(expr, id, ctx),

            FilterExpr::Matches { value, pattern } => {
                let (v, value_node) = self.operand(value, ctx)?;
                let result = match ctx.regex(pattern) {
                    Ok(regex) => v.as_str().is_some_and(|s| regex.is_match(s)),
                    Err(message) => {
                        ctx.report(Error::invalid_filter_pattern(&**pattern, message), COMPONENT);
                        false
                    }
                };
                Ok(Outcome {
                    result,
                    node: self
                        .node(expr, result)
                        .map(|n| n.with_children(value_node.into_iter().collect())),
                })
            }

            FilterExpr::Unsupported { operator, reason, .. } => {
                ctx.report(
                    Error::invalid_filter_pattern(&**operator, &**reason),
                    COMPONENT,
                );
                Ok(Outcome {
                    result: false,
                    node: self.node(expr, false),
                })
            }
        }
    }

    /// `and` stops at the first false clause, `or` at the first true one.
    /// With breakdowns on, the remaining clauses are still evaluated,
    /// quietly, and marked short-circuited.
    fn junction(
        &mut self,
        expr: &FilterExpr,
        items: &[FilterExpr],
        stop_on: bool,
        ctx: &mut EvaluationContext<'_>,
    ) -> Result<Outcome> {
        let mut result = !stop_on;
        let mut children = Vec::new();

        for item in items {
            if result == stop_on {
                if !self.build {
                    break;
                }
                let node = ctx.speculate(|ctx| match self.clause(item, ctx) {
                    Ok(outcome) => outcome.node,
                    Err(_) => self.node(item, false),
                });
                children.extend(node.map(BreakdownNode::short_circuited));
                continue;
            }

            let outcome = self.clause(item, ctx)?;
            if outcome.result == stop_on {
                result = stop_on;
            }
            children.extend(outcome.node);
        }

        Ok(Outcome {
            result,
            node: self.node(expr, result).map(|n| n.with_children(children)),
        })
    }

    fn condition(
        &mut self,
        expr: &FilterExpr,
        id: &Arc<str>,
        ctx: &mut EvaluationContext<'_>,
    ) -> Result<Outcome> {
        if ctx.conditions().contains(id) {
            let mut chain: Vec<String> = ctx.conditions().iter().map(ToString::to_string).collect();
            chain.push(id.to_string());
            return Err(ctx.report(Error::cycle_detected(chain), COMPONENT));
        }

        let Some(condition) = ctx.registry().and_then(|r| r.condition(id)) else {
            ctx.report(Error::condition_not_found(&**id), COMPONENT);
            return Ok(Outcome {
                result: false,
                node: self.node(expr, false),
            });
        };

        ctx.push_condition(id.clone());
        let inner = self.clause(condition, ctx);
        ctx.pop_condition();
        let inner = inner?;

        Ok(Outcome {
            result: inner.result,
            node: self
                .node(expr, inner.result)
                .map(|n| n.with_children(inner.node.into_iter().collect())),
        })
    }

    /// Evaluates an expression used as a value.
    fn operand(
        &mut self,
        expr: &FilterExpr,
        ctx: &mut EvaluationContext<'_>,
    ) -> Result<(Value, Option<BreakdownNode>)> {
        let value = match expr {
            FilterExpr::Literal(value) => value.clone(),
            FilterExpr::Var(path) => resolve_var(path, self.candidate, ctx),
            _ => {
                let outcome = self.clause(expr, ctx)?;
                return Ok((Value::Bool(outcome.result), outcome.node));
            }
        };
        let node = self
            .node(expr, value.is_truthy())
            .map(|n| n.with_value(value.clone()));
        Ok((value, node))
    }
}

fn compare(op: CompareOp, left: &Value, right: &Value) -> bool {
    use std::cmp::Ordering::{Equal, Greater, Less};
    match op {
        CompareOp::Eq | CompareOp::StrictEq => left.strict_eq(right),
        CompareOp::Ne | CompareOp::StrictNe => !left.strict_eq(right),
        CompareOp::Lt => left.compare(right) == Some(Less),
        CompareOp::Le => matches!(left.compare(right), Some(Less | Equal)),
        CompareOp::Gt => left.compare(right) == Some(Greater),
        CompareOp::Ge => matches!(left.compare(right), Some(Greater | Equal)),
    }
}

// =============================================================================
// Variable paths
// =============================================================================

enum Cursor {
    Entity(EntityId),
    Components(EntityId),
    Value(Value),
}

impl Cursor {
    fn from_item(item: &Item) -> Self {
        match item {
            Item::Value(Value::EntityRef(id)) => Self::Entity(id.clone()),
            Item::Value(value) => Self::Value(value.clone()),
            Item::Components(id) => Self::Components(id.clone()),
            Item::Clothing(_) => Self::Value(Value::Null),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Self::Entity(id) => Value::EntityRef(id),
            Self::Components(_) => Value::Null,
            Self::Value(value) => value,
        }
    }
}

/// Resolves a dotted `var` path.
///
/// A leading `entity` or `self` names the candidate, `actor` the actor and
/// `location` the actor's location; any other path starts at the
/// candidate. On an entity, `id` is its id, `components` its component
/// table and any segment containing `:` a component. Map fields and list
/// indices work as expected. Anything missing resolves to null.
#[must_use]
pub fn resolve_var(path: &str, candidate: &Item, ctx: &EvaluationContext<'_>) -> Value {
    let mut segments = path.split('.').filter(|s| !s.is_empty()).peekable();

    let mut cursor = match segments.peek().copied() {
        Some("entity" | "self") => {
            segments.next();
            Cursor::from_item(candidate)
        }
        Some("actor") => {
            segments.next();
            Cursor::Entity(ctx.actor().clone())
        }
        Some("location") => {
            segments.next();
            match ctx.location() {
                Some(location) => Cursor::Entity(location),
                None => return Value::Null,
            }
        }
        _ => Cursor::from_item(candidate),
    };

    let gateway = ctx.gateway();
    for segment in segments {
        cursor = match cursor {
            Cursor::Entity(id) => match segment {
                "id" => Cursor::Value(Value::from(id.as_str())),
                "components" => Cursor::Components(id),
                component if component.contains(':') => {
                    match gateway.get_component(&id, component) {
                        Some(value) => Cursor::Value(value),
                        None => return Value::Null,
                    }
                }
                _ => return Value::Null,
            },
            Cursor::Components(id) => match gateway.get_component(&id, segment) {
                Some(value) => Cursor::Value(value),
                None => return Value::Null,
            },
            Cursor::Value(Value::EntityRef(id)) => {
                // step through the referenced entity
                let stepped = match segment {
                    "id" => Some(Cursor::Value(Value::from(id.as_str()))),
                    "components" => Some(Cursor::Components(id)),
                    component if component.contains(':') => {
                        gateway.get_component(&id, component).map(Cursor::Value)
                    }
                    _ => None,
                };
                match stepped {
                    Some(cursor) => cursor,
                    None => return Value::Null,
                }
            }
            Cursor::Value(value) => {
                let next = match &value {
                    Value::Map(map) => map.get(segment).cloned(),
                    Value::List(list) => segment.parse::<usize>().ok().and_then(|i| list.get(i).cloned()),
                    _ => None,
                };
                match next {
                    Some(value) => Cursor::Value(value),
                    None => return Value::Null,
                }
            }
        };
    }

    cursor.into_value()
}
