//! Filter expressions.
//!
//! Filters are a JSON-Logic dialect. Decoding is lenient about operators
//! (an unknown operator becomes [`FilterExpr::Unsupported`] and simply
//! evaluates to false) but strict about shape: an object that is not a
//! single-key operator is a malformed tree.

use std::fmt;
use std::sync::Arc;

use scopedsl_foundation::{Error, Result, Value};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Comparison operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CompareOp {
    /// `==`
    Eq,
    /// `===`
    StrictEq,
    /// `!=`
    Ne,
    /// `!==`
    StrictNe,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CompareOp {
    /// Parses an operator token.
    #[must_use]
    pub fn from_operator(op: &str) -> Option<Self> {
        Some(match op {
            "==" => Self::Eq,
            "===" => Self::StrictEq,
            "!=" => Self::Ne,
            "!==" => Self::StrictNe,
            "<" => Self::Lt,
            "<=" => Self::Le,
            ">" => Self::Gt,
            ">=" => Self::Ge,
            _ => return None,
        })
    }

    /// Returns the operator token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::StrictEq => "===",
            Self::Ne => "!=",
            Self::StrictNe => "!==",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    /// Returns true for the equality family.
    #[must_use]
    pub const fn is_equality(self) -> bool {
        matches!(self, Self::Eq | Self::StrictEq | Self::Ne | Self::StrictNe)
    }
}

/// A boolean filter expression.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FilterExpr {
    /// A constant.
    Literal(Value),
    /// A dotted path resolved against the candidate or context.
    Var(Arc<str>),
    /// Binary comparison.
    Compare {
        /// Operator.
        op: CompareOp,
        /// Left operand.
        left: Box<FilterExpr>,
        /// Right operand.
        right: Box<FilterExpr>,
    },
    /// Conjunction, short-circuiting left to right.
    And(Vec<FilterExpr>),
    /// Disjunction, short-circuiting left to right.
    Or(Vec<FilterExpr>),
    /// Negation of truthiness.
    Not(Box<FilterExpr>),
    /// Membership in a list, or substring of a string.
    In {
        /// The value looked for.
        needle: Box<FilterExpr>,
        /// The list or string searched.
        haystack: Box<FilterExpr>,
    },
    /// True if the entity at `target` carries `component`.
    ComponentPresent {
        /// Var path naming the entity to test.
        target: Arc<str>,
        /// Component type.
        component: Arc<str>,
    },
    /// A named condition stored in the registry.
    ConditionRef(Arc<str>),
    /// Regular expression match on a string value.
    Matches {
        /// Expression producing the string to test.
        value: Box<FilterExpr>,
        /// Regex source.
        pattern: Arc<str>,
    },
    /// An operator the evaluator does not understand.
    Unsupported {
        /// The operator as written.
        operator: Arc<str>,
        /// The operator's arguments as written.
        args: serde_json::Value,
        /// Why it was not accepted.
        reason: Arc<str>,
    },
}

impl FilterExpr {
    /// Creates a literal.
    #[must_use]
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Creates a var lookup.
    #[must_use]
    pub fn var(path: &str) -> Self {
        Self::Var(path.into())
    }

    /// Creates a comparison.
    #[must_use]
    pub fn compare(op: CompareOp, left: FilterExpr, right: FilterExpr) -> Self {
        Self::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates an `==` comparison.
    #[must_use]
    pub fn equals(left: FilterExpr, right: FilterExpr) -> Self {
        Self::compare(CompareOp::Eq, left, right)
    }

    /// Creates a negation.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: FilterExpr) -> Self {
        Self::Not(Box::new(inner))
    }

    /// Creates a component test on the current candidate.
    #[must_use]
    pub fn has_component(component: &str) -> Self {
        Self::ComponentPresent {
            target: "entity".into(),
            component: component.into(),
        }
    }

    /// Creates a named condition reference.
    #[must_use]
    pub fn condition(id: &str) -> Self {
        Self::ConditionRef(id.into())
    }

    /// Decodes JSON-Logic.
    ///
    /// # Errors
    /// Returns a `MalformedAst` error if an object is not a single-key operator.
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(map) = json else {
            return Ok(Self::Literal(Value::from_json(json)));
        };
        let mut entries = map.iter();
        let (Some((op, args)), None) = (entries.next(), entries.next()) else {
            return Err(Error::malformed_ast(format!(
                "filter object must have exactly one operator, found {}",
                map.len()
            )));
        };

        let raw = args;
        let args: Vec<&serde_json::Value> = match raw {
            serde_json::Value::Array(items) => items.iter().collect(),
            single => vec![single],
        };
        let unsupported = |reason: &str| Self::Unsupported {
            operator: op.as_str().into(),
            args: raw.clone(),
            reason: reason.into(),
        };

        if let Some(cmp) = CompareOp::from_operator(op) {
            let [left, right] = args.as_slice() else {
                return Ok(unsupported("expects 2 arguments"));
            };
            return Ok(Self::compare(cmp, Self::from_json(left)?, Self::from_json(right)?));
        }

        Ok(match op.as_str() {
            "var" => match args.first().and_then(|a| a.as_str()) {
                Some(path) => Self::Var(path.into()),
                None => unsupported("expects a path string"),
            },
            "and" => Self::And(Self::decode_all(&args)?),
            "or" => Self::Or(Self::decode_all(&args)?),
            "!" => match args.as_slice() {
                [inner] => Self::not(Self::from_json(inner)?),
                _ => unsupported("expects 1 argument"),
            },
            "in" => match args.as_slice() {
                [needle, haystack] => Self::In {
                    needle: Box::new(Self::from_json(needle)?),
                    haystack: Box::new(Self::from_json(haystack)?),
                },
                _ => unsupported("expects 2 arguments"),
            },
            "has_component" => match args.as_slice() {
                [component] => match component.as_str() {
                    Some(component) => Self::has_component(component),
                    None => unsupported("component type must be a string"),
                },
                [target, component] => match (target.as_str(), component.as_str()) {
                    (Some(target), Some(component)) => Self::ComponentPresent {
                        target: target.into(),
                        component: component.into(),
                    },
                    _ => unsupported("entity path and component type must be strings"),
                },
                _ => unsupported("expects 1 or 2 arguments"),
            },
            "condition_ref" => match args.as_slice() {
                [serde_json::Value::String(id)] => Self::ConditionRef(id.as_str().into()),
                _ => unsupported("expects a condition id string"),
            },
            "matches" => match args.as_slice() {
                [value, serde_json::Value::String(pattern)] => Self::Matches {
                    value: Box::new(Self::from_json(value)?),
                    pattern: pattern.as_str().into(),
                },
                _ => unsupported("expects a value and a pattern string"),
            },
            _ => unsupported("unknown operator"),
        })
    }

    fn decode_all(args: &[&serde_json::Value]) -> Result<Vec<Self>> {
        args.iter().map(|a| Self::from_json(a)).collect()
    }

    /// Encodes back to JSON-Logic.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Literal(value) => value.to_json(),
            Self::Var(path) => json!({ "var": &**path }),
            Self::Compare { op, left, right } => {
                json!({ op.as_str(): [left.to_json(), right.to_json()] })
            }
            Self::And(items) => {
                json!({ "and": items.iter().map(Self::to_json).collect::<Vec<_>>() })
            }
            Self::Or(items) => {
                json!({ "or": items.iter().map(Self::to_json).collect::<Vec<_>>() })
            }
            Self::Not(inner) => json!({ "!": [inner.to_json()] }),
            Self::In { needle, haystack } => {
                json!({ "in": [needle.to_json(), haystack.to_json()] })
            }
            Self::ComponentPresent { target, component } => {
                json!({ "has_component": [&**target, &**component] })
            }
            Self::ConditionRef(id) => json!({ "condition_ref": &**id }),
            Self::Matches { value, pattern } => {
                json!({ "matches": [value.to_json(), &**pattern] })
            }
            Self::Unsupported { operator, args, .. } => json!({ operator.to_string(): args }),
        }
    }

    /// Returns the node name used in breakdown trees.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::Var(_) => "var",
            Self::Compare { .. } => "compare",
            Self::And(_) => "and",
            Self::Or(_) => "or",
            Self::Not(_) => "not",
            Self::In { .. } => "in",
            Self::ComponentPresent { .. } => "has_component",
            Self::ConditionRef(_) => "condition_ref",
            Self::Matches { .. } => "matches",
            Self::Unsupported { .. } => "unsupported",
        }
    }

    /// Returns the direct sub-expressions.
    #[must_use]
    pub fn children(&self) -> Vec<&FilterExpr> {
        match self {
            Self::Literal(_)
            | Self::Var(_)
            | Self::ComponentPresent { .. }
            | Self::ConditionRef(_)
            | Self::Unsupported { .. } => Vec::new(),
            Self::Compare { left, right, .. } => vec![left, right],
            Self::And(items) | Self::Or(items) => items.iter().collect(),
            Self::Not(inner) => vec![inner],
            Self::In { needle, haystack } => vec![needle, haystack],
            Self::Matches { value, .. } => vec![value],
        }
    }
}

/// Renders a compact infix description, used in breakdown trees.
impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, items: &[FilterExpr], sep: &str) -> fmt::Result {
            write!(f, "(")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, " {sep} ")?;
                }
                write!(f, "{item}")?;
            }
            write!(f, ")")
        }

        match self {
            Self::Literal(value) => write!(f, "{value}"),
            Self::Var(path) => write!(f, "{path}"),
            Self::Compare { op, left, right } => write!(f, "{left} {} {right}", op.as_str()),
            Self::And(items) => join(f, items, "and"),
            Self::Or(items) => join(f, items, "or"),
            Self::Not(inner) => write!(f, "!{inner}"),
            Self::In { needle, haystack } => write!(f, "{needle} in {haystack}"),
            Self::ComponentPresent { target, component } => {
                write!(f, "has_component({target}, {component})")
            }
            Self::ConditionRef(id) => write!(f, "condition_ref({id})"),
            Self::Matches { value, pattern } => write!(f, "{value} matches /{pattern}/"),
            Self::Unsupported { operator, args, .. } => match args {
                serde_json::Value::Array(items) => {
                    write!(f, "{operator}(")?;
                    for (i, item) in items.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{item}")?;
                    }
                    write!(f, ")")
                }
                single => write!(f, "{operator}({single})"),
            },
        }
    }
}
