//! Error recording.
//!
//! The [`ErrorHandler`] classifies every error raised during a resolution,
//! attaches context and keeps a bounded list of [`Diagnostic`]s. It never
//! decides whether resolution continues; the calling resolver does that
//! from [`Error::is_recoverable`].

use std::collections::VecDeque;

use scopedsl_foundation::{Error, ErrorCode, ErrorContext};
use scopedsl_language::ScopeId;
use tracing::{debug, warn};

/// A recorded error.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// Stable error code.
    pub code: ErrorCode,
    /// Rendered error message.
    pub message: String,
    /// Where and on what the error happened.
    pub context: ErrorContext,
    /// Whether resolution continued after the error.
    pub recoverable: bool,
    /// How many times this exact error was raised.
    pub occurrences: usize,
}

impl Diagnostic {
    /// Builds a diagnostic from an error.
    #[must_use]
    pub fn from_error(error: &Error) -> Self {
        Self {
            code: error.code(),
            message: error.kind.to_string(),
            context: error.context.clone().unwrap_or_default(),
            recoverable: error.is_recoverable(),
            occurrences: 1,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        let context = self.context.to_string();
        if !context.is_empty() {
            write!(f, " ({context})")?;
        }
        if self.occurrences > 1 {
            write!(f, " x{}", self.occurrences)?;
        }
        Ok(())
    }
}

/// Bounded collector of diagnostics for one resolution.
#[derive(Clone, Debug)]
pub struct ErrorHandler {
    diagnostics: VecDeque<Diagnostic>,
    capacity: usize,
    dropped: usize,
}

impl ErrorHandler {
    /// Creates a handler keeping at most `capacity` diagnostics.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            diagnostics: VecDeque::new(),
            capacity,
            dropped: 0,
        }
    }

    /// Records an error and returns it with context attached.
    ///
    /// `component` names the resolver that raised it; `chain` is the scope
    /// reference chain active at the time. Context already on the error is
    /// kept. A recoverable error identical to one already recorded only
    /// bumps that diagnostic's occurrence count.
    pub fn handle(&mut self, error: Error, component: &str, chain: &[ScopeId]) -> Error {
        let mut context = error.context.clone().unwrap_or_default();
        if context.component.is_none() {
            context.component = Some(component.to_string());
        }
        if context.scope_chain.is_empty() {
            context.scope_chain = chain.iter().map(ToString::to_string).collect();
        }
        let error = error.with_context(context);
        let diagnostic = Diagnostic::from_error(&error);

        if diagnostic.recoverable {
            warn!(code = %diagnostic.code, component, message = %diagnostic.message, "recoverable resolution error");
            if let Some(existing) = self.diagnostics.iter_mut().find(|d| {
                d.code == diagnostic.code
                    && d.message == diagnostic.message
                    && d.context == diagnostic.context
            }) {
                existing.occurrences += 1;
                return error;
            }
        } else {
            debug!(code = %diagnostic.code, component, message = %diagnostic.message, "resolution aborted");
        }

        self.diagnostics.push_back(diagnostic);
        while self.diagnostics.len() > self.capacity {
            self.diagnostics.pop_front();
            self.dropped += 1;
        }
        error
    }

    /// Returns the recorded diagnostics, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Returns the number of diagnostics held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Returns the number of diagnostics evicted for capacity.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Returns how many held diagnostics carry the code.
    #[must_use]
    pub fn count(&self, code: ErrorCode) -> usize {
        self.diagnostics.iter().filter(|d| d.code == code).count()
    }

    /// Consumes the handler, returning the diagnostics.
    #[must_use]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics.into()
    }
}
