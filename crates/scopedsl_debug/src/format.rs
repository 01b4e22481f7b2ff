//! Trace output formatters.
//!
//! Provides human-readable and JSON formatters for trace records, filter
//! breakdowns, and whole resolution results.

use std::fmt::Write;

use scopedsl_engine::{
    BreakdownNode, Diagnostic, FilterBreakdown, ResolutionResult, TraceEvent, TraceRecord,
};
use serde_json::json;

/// Glyph for a passing step.
pub const PASS: &str = "✓";
/// Glyph for a failing step.
pub const FAIL: &str = "✗";
/// Glyph for a clause that did not affect the outcome.
pub const SKIPPED: &str = "⊘";

// =============================================================================
// Trace Formatter Trait
// =============================================================================

/// Trait for formatting resolution diagnostics.
pub trait TraceFormatter {
    /// Formats a single trace record to a string.
    fn format(&self, record: &TraceRecord) -> String;

    /// Formats multiple records.
    fn format_many(&self, records: &[&TraceRecord]) -> String {
        records
            .iter()
            .map(|r| self.format(r))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Formats one candidate's filter breakdown.
    fn format_breakdown(&self, breakdown: &FilterBreakdown) -> String;

    /// Formats everything a resolution produced.
    fn format_result(&self, result: &ResolutionResult) -> String;
}

// =============================================================================
// Human-Readable Formatter
// =============================================================================

/// Formats diagnostics as indented text.
///
/// Trace records are indented by their dispatcher depth; breakdown clauses
/// by their depth in the filter tree.
#[derive(Clone, Debug, Default)]
pub struct HumanFormatter {
    /// Whether to include record IDs.
    pub show_ids: bool,
    /// Whether to show resolved operand values in breakdowns.
    pub show_values: bool,
}

impl HumanFormatter {
    /// Creates a new human formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to show record IDs.
    #[must_use]
    pub fn with_ids(mut self) -> Self {
        self.show_ids = true;
        self
    }

    /// Builder method to show resolved operand values.
    #[must_use]
    pub fn with_values(mut self) -> Self {
        self.show_values = true;
        self
    }

    fn glyph(passed: bool) -> &'static str {
        if passed { PASS } else { FAIL }
    }

    fn describe(event: &TraceEvent) -> String {
        match event {
            TraceEvent::ScopeEnter { scope } => format!("enter {scope}"),
            TraceEvent::ScopeExit {
                scope,
                result_count,
                success,
            } => {
                if *success {
                    format!("exit {scope} ({result_count} results)")
                } else {
                    format!("exit {scope} (failed)")
                }
            }
            TraceEvent::NodeResolved { node, result_count } => {
                format!("{node} -> {result_count}")
            }
            TraceEvent::CandidateIncluded { item, slot, layer } => match (slot, layer) {
                (Some(slot), Some(layer)) => format!("include {item} at {slot}/{layer}"),
                _ => format!("include {item}"),
            },
            TraceEvent::CandidateSkipped {
                item,
                reason,
                blocked_by,
            } => match blocked_by {
                Some(blocker) => format!("skip {item}: {reason}, blocked by {blocker}"),
                None => format!("skip {item}: {reason}"),
            },
            TraceEvent::FilterEvaluated { candidate, passed } => {
                let outcome = if *passed { "passed" } else { "rejected" };
                format!("filter {outcome} {candidate}")
            }
            TraceEvent::Error {
                code,
                message,
                recoverable,
            } => {
                let severity = if *recoverable { "recovered" } else { "fatal" };
                format!("[{code}] {message} ({severity})")
            }
        }
    }

    fn write_node(&self, out: &mut String, node: &BreakdownNode, indent: usize) {
        let glyph = if node.is_short_circuited() {
            SKIPPED
        } else {
            Self::glyph(node.result)
        };
        let _ = write!(out, "{}{glyph} {}", "  ".repeat(indent), node.description);
        if self.show_values {
            if let Some(value) = &node.value {
                let _ = write!(out, " = {value}");
            }
        }
        out.push('\n');
        for child in &node.children {
            self.write_node(out, child, indent + 1);
        }
    }

    fn format_diagnostic(diagnostic: &Diagnostic) -> String {
        let glyph = if diagnostic.recoverable { SKIPPED } else { FAIL };
        format!("{glyph} {diagnostic}")
    }
}

impl TraceFormatter for HumanFormatter {
    fn format(&self, record: &TraceRecord) -> String {
        let mut line = String::new();
        if self.show_ids {
            let _ = write!(line, "[{:06}] ", record.id);
        }
        let _ = write!(
            line,
            "{}{} {}",
            "  ".repeat(record.depth),
            Self::glyph(record.event.passed()),
            Self::describe(&record.event)
        );
        line
    }

    fn format_breakdown(&self, breakdown: &FilterBreakdown) -> String {
        let mut out = format!(
            "{} {} against {}\n",
            Self::glyph(breakdown.passed()),
            breakdown.candidate,
            breakdown.expr
        );
        self.write_node(&mut out, &breakdown.root, 1);
        out.truncate(out.trim_end().len());
        out
    }

    fn format_result(&self, result: &ResolutionResult) -> String {
        let mut sections = Vec::new();

        sections.push(match &result.outcome {
            Ok(set) => {
                let labels: Vec<_> = set.iter().map(scopedsl_engine::Item::label).collect();
                format!("{PASS} resolved {} item(s): [{}]", set.len(), labels.join(", "))
            }
            Err(error) => format!("{FAIL} [{}] {error}", error.code()),
        });

        if let Some(trace) = &result.trace {
            let records: Vec<_> = trace.iter().collect();
            if !records.is_empty() {
                sections.push(format!("trace:\n{}", self.format_many(&records)));
            }
            if trace.dropped() > 0 {
                sections.push(format!("({} earlier records dropped)", trace.dropped()));
            }
        }

        for breakdown in &result.breakdowns {
            sections.push(self.format_breakdown(breakdown));
        }

        if !result.diagnostics.is_empty() {
            let lines: Vec<_> = result
                .diagnostics
                .iter()
                .map(Self::format_diagnostic)
                .collect();
            sections.push(format!("diagnostics:\n{}", lines.join("\n")));
        }

        sections.join("\n")
    }
}

// =============================================================================
// JSON Formatter
// =============================================================================

/// Formats diagnostics as JSON.
#[derive(Clone, Debug, Default)]
pub struct JsonFormatter {
    /// Whether to pretty-print JSON.
    pub pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method for pretty printing.
    #[must_use]
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn render(&self, value: &serde_json::Value) -> String {
        if self.pretty {
            serde_json::to_string_pretty(value).unwrap_or_default()
        } else {
            value.to_string()
        }
    }

    /// Converts a trace record to a JSON value.
    #[must_use]
    pub fn record_json(record: &TraceRecord) -> serde_json::Value {
        let data = match &record.event {
            TraceEvent::ScopeEnter { scope } => json!({ "scope": scope }),
            TraceEvent::ScopeExit {
                scope,
                result_count,
                success,
            } => json!({ "scope": scope, "result_count": result_count, "success": success }),
            TraceEvent::NodeResolved { node, result_count } => {
                json!({ "node": node, "result_count": result_count })
            }
            TraceEvent::CandidateIncluded { item, slot, layer } => {
                json!({ "item": item, "slot": slot, "layer": layer })
            }
            TraceEvent::CandidateSkipped {
                item,
                reason,
                blocked_by,
            } => json!({
                "item": item,
                "reason": reason,
                "blocked_by": blocked_by.as_ref().map(ToString::to_string),
            }),
            TraceEvent::FilterEvaluated { candidate, passed } => {
                json!({ "candidate": candidate, "passed": passed })
            }
            TraceEvent::Error {
                code,
                message,
                recoverable,
            } => json!({ "code": code.as_str(), "message": message, "recoverable": recoverable }),
        };
        json!({
            "id": record.id,
            "depth": record.depth,
            "type": record.event_type(),
            "data": data,
        })
    }

    /// Converts a breakdown clause tree to a JSON value.
    #[must_use]
    pub fn node_json(node: &BreakdownNode) -> serde_json::Value {
        let mut object = json!({
            "kind": node.kind,
            "description": node.description,
            "result": node.result,
            "short_circuited": node.is_short_circuited(),
        });
        if let Some(value) = &node.value {
            object["value"] = value.to_json();
        }
        if !node.children.is_empty() {
            object["children"] = node.children.iter().map(Self::node_json).collect();
        }
        object
    }

    fn breakdown_json(breakdown: &FilterBreakdown) -> serde_json::Value {
        json!({
            "candidate": breakdown.candidate,
            "expr": breakdown.expr,
            "passed": breakdown.passed(),
            "root": Self::node_json(&breakdown.root),
        })
    }

    fn diagnostic_json(diagnostic: &Diagnostic) -> serde_json::Value {
        let context = &diagnostic.context;
        json!({
            "code": diagnostic.code.as_str(),
            "message": diagnostic.message,
            "recoverable": diagnostic.recoverable,
            "occurrences": diagnostic.occurrences,
            "component": context.component,
            "entity": context.entity.as_ref().map(ToString::to_string),
            "slot": context.slot,
            "layer": context.layer,
            "scope_chain": context.scope_chain,
        })
    }

    /// Converts a resolution result to a JSON value.
    #[must_use]
    pub fn result_json(result: &ResolutionResult) -> serde_json::Value {
        let outcome = match &result.outcome {
            Ok(set) => json!({
                "ok": true,
                "items": set.iter().map(scopedsl_engine::Item::label).collect::<Vec<_>>(),
            }),
            Err(error) => json!({
                "ok": false,
                "code": error.code().as_str(),
                "message": error.to_string(),
            }),
        };
        let trace = result
            .trace
            .as_ref()
            .map(|t| t.iter().map(Self::record_json).collect::<Vec<_>>());
        json!({
            "outcome": outcome,
            "trace": trace,
            "breakdowns": result.breakdowns.iter().map(Self::breakdown_json).collect::<Vec<_>>(),
            "diagnostics": result.diagnostics.iter().map(Self::diagnostic_json).collect::<Vec<_>>(),
        })
    }
}

impl TraceFormatter for JsonFormatter {
    fn format(&self, record: &TraceRecord) -> String {
        self.render(&Self::record_json(record))
    }

    fn format_many(&self, records: &[&TraceRecord]) -> String {
        let items: Vec<_> = records.iter().map(|r| Self::record_json(r)).collect();
        self.render(&serde_json::Value::Array(items))
    }

    fn format_breakdown(&self, breakdown: &FilterBreakdown) -> String {
        self.render(&Self::breakdown_json(breakdown))
    }

    fn format_result(&self, result: &ResolutionResult) -> String {
        self.render(&Self::result_json(result))
    }
}

// =============================================================================
// Tests
// =============================================================================
