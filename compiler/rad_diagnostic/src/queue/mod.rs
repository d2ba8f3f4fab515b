//! Bounded diagnostic collection.
//!
//! One syntax error can cascade into many follow-on errors, so the collector
//! keeps only the first `error_limit` diagnostics and counts the rest for an
//! `...and N more errors` line.

use crate::emitter::DiagnosticEmitter;
use crate::Diagnostic;

/// Configuration for diagnostic collection.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of diagnostics kept (0 = unlimited).
    pub error_limit: usize,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig { error_limit: 10 }
    }
}

impl DiagnosticConfig {
    /// No limit (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig { error_limit: 0 }
    }
}

/// Accumulates diagnostics up to a limit.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    total: usize,
    config: DiagnosticConfig,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticCollector {
            diagnostics: Vec::new(),
            total: 0,
            config,
        }
    }

    /// Add a diagnostic.
    ///
    /// Returns `false` once the limit is reached, telling the producer it
    /// can stop.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        self.total += 1;
        if self.at_limit() {
            return false;
        }
        self.diagnostics.push(diag);
        true
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics offered, including the dropped ones.
    pub fn total_emitted(&self) -> usize {
        self.total
    }

    /// Diagnostics dropped by the limit.
    pub fn remaining(&self) -> usize {
        self.total - self.diagnostics.len()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn at_limit(&self) -> bool {
        self.config.error_limit > 0 && self.diagnostics.len() >= self.config.error_limit
    }

    /// Emit every kept diagnostic, then the dropped count.
    pub fn emit_to(&self, emitter: &mut dyn DiagnosticEmitter) {
        emitter.emit_all(&self.diagnostics);
        emitter.emit_truncated(self.remaining());
        emitter.flush();
    }
}

#[cfg(test)]
mod tests;
