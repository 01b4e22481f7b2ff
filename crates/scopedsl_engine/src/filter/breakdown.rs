//! Clause-by-clause filter results.

use scopedsl_foundation::Value;

/// Whether a clause's result decided anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClauseStatus {
    /// The clause was evaluated as part of computing the result.
    Evaluated,
    /// The clause came after a short-circuit. Its result is shown for
    /// diagnosis only and did not affect the outcome.
    ShortCircuited,
}

/// One clause of a filter and what it produced.
#[derive(Clone, Debug, PartialEq)]
pub struct BreakdownNode {
    /// Rendered clause.
    pub description: String,
    /// Clause kind, as named by `FilterExpr::kind_name`.
    pub kind: &'static str,
    /// The clause's boolean result.
    pub result: bool,
    /// Whether the result counted.
    pub status: ClauseStatus,
    /// Resolved value, for operands and entity lookups.
    pub value: Option<Value>,
    /// Sub-clauses.
    pub children: Vec<BreakdownNode>,
}

impl BreakdownNode {
    /// Creates an evaluated clause with no children.
    #[must_use]
    pub fn new(kind: &'static str, description: impl Into<String>, result: bool) -> Self {
        Self {
            description: description.into(),
            kind,
            result,
            status: ClauseStatus::Evaluated,
            value: None,
            children: Vec::new(),
        }
    }

    /// Builder method to attach a resolved value.
    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Builder method to set the sub-clauses.
    #[must_use]
    pub fn with_children(mut self, children: Vec<BreakdownNode>) -> Self {
        self.children = children;
        self
    }

    /// Marks the clause as short-circuited.
    #[must_use]
    pub fn short_circuited(mut self) -> Self {
        self.status = ClauseStatus::ShortCircuited;
        self
    }

    /// Returns true if the clause did not affect the outcome.
    #[must_use]
    pub fn is_short_circuited(&self) -> bool {
        self.status == ClauseStatus::ShortCircuited
    }

    /// Recomputes this clause's result from its children.
    ///
    /// `and`/`or` combine their evaluated children, `not` negates its
    /// child and `condition_ref` passes its child through. Every other kind
    /// is a leaf and yields its own result. For a tree built by the
    /// evaluator this always equals [`result`](Self::result).
    #[must_use]
    pub fn recombine(&self) -> bool {
        let mut evaluated = self.children.iter().filter(|c| !c.is_short_circuited());
        match self.kind {
            "and" => evaluated.all(BreakdownNode::recombine),
            "or" => evaluated.any(BreakdownNode::recombine),
            "not" => self.children.first().map_or(self.result, |c| !c.recombine()),
            "condition_ref" => self.children.first().map_or(self.result, BreakdownNode::recombine),
            _ => self.result,
        }
    }

    /// Returns the number of clauses in this tree.
    #[must_use]
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(BreakdownNode::size).sum::<usize>()
    }
}

/// A breakdown tree for one candidate.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterBreakdown {
    /// Label of the candidate filtered.
    pub candidate: String,
    /// The filter, rendered.
    pub expr: String,
    /// The root clause.
    pub root: BreakdownNode,
}

impl FilterBreakdown {
    /// Returns the filter outcome.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.root.result
    }
}
