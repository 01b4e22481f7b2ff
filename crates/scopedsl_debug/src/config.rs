//! Configuration for diagnostic export.

use scopedsl_engine::ResolutionResult;

use crate::format::{HumanFormatter, JsonFormatter, TraceFormatter};

/// Controls how resolution diagnostics are rendered.
#[derive(Clone, Debug, Default)]
pub struct ExportConfig {
    /// Output format: true for JSON, false for human-readable.
    pub json_output: bool,

    /// Pretty-print JSON output.
    pub pretty: bool,

    /// Include trace record IDs in human output.
    pub show_ids: bool,

    /// Include resolved operand values in breakdowns.
    pub show_values: bool,
}

impl ExportConfig {
    /// Creates a configuration for interactive debugging.
    #[must_use]
    pub fn development() -> Self {
        Self {
            show_ids: true,
            show_values: true,
            ..Self::default()
        }
    }

    /// Creates a configuration for tooling that consumes JSON.
    #[must_use]
    pub fn machine() -> Self {
        Self {
            json_output: true,
            ..Self::default()
        }
    }

    /// Builder method to enable/disable JSON output.
    #[must_use]
    pub fn with_json_output(mut self, json: bool) -> Self {
        self.json_output = json;
        self
    }

    /// Builder method to enable/disable pretty JSON.
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Builder method to show record IDs.
    #[must_use]
    pub fn with_ids(mut self, show: bool) -> Self {
        self.show_ids = show;
        self
    }

    /// Builder method to show operand values.
    #[must_use]
    pub fn with_values(mut self, show: bool) -> Self {
        self.show_values = show;
        self
    }

    /// Builds the formatter this configuration describes.
    #[must_use]
    pub fn formatter(&self) -> Box<dyn TraceFormatter> {
        if self.json_output {
            Box::new(JsonFormatter {
                pretty: self.pretty,
            })
        } else {
            Box::new(HumanFormatter {
                show_ids: self.show_ids,
                show_values: self.show_values,
            })
        }
    }

    /// Renders a resolution result.
    #[must_use]
    pub fn render(&self, result: &ResolutionResult) -> String {
        self.formatter().format_result(result)
    }
}
