//! Diagnostic Emitters
//!
//! [`TerminalEmitter`] renders diagnostics as annotated source snippets for a
//! human reading a terminal. Emitters implement [`DiagnosticEmitter`] so the
//! driver can render a [`DiagnosticCollector`](crate::queue::DiagnosticCollector)
//! without caring about the output format.

mod terminal;

pub use terminal::{ColorMode, SourceFile, TerminalEmitter};

use crate::Diagnostic;

/// Trait for emitting diagnostics.
pub trait DiagnosticEmitter {
    /// Emit a single diagnostic.
    fn emit(&mut self, diagnostic: &Diagnostic);

    /// Emit multiple diagnostics.
    fn emit_all(&mut self, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            self.emit(diag);
        }
    }

    /// Report diagnostics that were dropped by an error limit.
    fn emit_truncated(&mut self, remaining: usize);

    /// Flush any buffered output.
    fn flush(&mut self);
}
