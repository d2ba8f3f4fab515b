//! Parse errors.

use rad_diagnostic::{Diagnostic, ErrorCode};
use rad_ir::Span;

use crate::token::TokenKind;

/// A syntax error with its location and an optional hint.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
    pub hint: Option<String>,
}

impl ParseError {
    #[cold]
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
            hint: None,
        }
    }

    /// "Expected X, found Y".
    #[cold]
    pub fn expected(code: ErrorCode, what: &str, found: &TokenKind, span: Span) -> Self {
        Self::new(code, format!("Expected {what}, found {}", found.describe()), span)
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code)
            .with_message(self.message.clone())
            .with_label(self.span, "");
        match &self.hint {
            Some(hint) => diag.with_hint(hint.clone()),
            None => diag,
        }
    }
}
