//! Token cursor for navigating the token stream.
//!
//! Provides lookahead and consumption, and tracks how many `Indent` blocks
//! are open so error recovery can resynchronize at statement boundaries.

use rad_diagnostic::ErrorCode;
use rad_ir::{ast::Ident, Span};
use tracing::trace;

use crate::token::{Token, TokenKind};
use crate::ParseError;

pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    indent_depth: usize,
}

impl<'a> Cursor<'a> {
    /// `tokens` must end with `Eof`, as the lexer guarantees.
    pub fn new(tokens: &'a [Token]) -> Self {
        Cursor {
            tokens,
            pos: 0,
            indent_depth: 0,
        }
    }

    #[inline]
    pub fn current(&self) -> &'a Token {
        self.token_at(self.pos)
    }

    #[inline]
    pub fn current_kind(&self) -> &'a TokenKind {
        &self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Span of the last consumed token.
    pub fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .map_or(Span::DUMMY, |prev| self.token_at(prev).span)
    }

    pub fn previous_kind(&self) -> Option<&'a TokenKind> {
        self.pos
            .checked_sub(1)
            .map(|prev| &self.token_at(prev).kind)
    }

    /// `peek_kind_at(0)` is the current token.
    pub fn peek_kind_at(&self, n: usize) -> &'a TokenKind {
        &self.token_at(self.pos + n).kind
    }

    /// Open `Indent` blocks at the current position.
    pub fn indent_depth(&self) -> usize {
        self.indent_depth
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Whether the current token is the same variant as `kind`.
    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind().same_kind(kind)
    }

    pub fn check_ident(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Ident(_))
    }

    /// Current token is the identifier `word`, used for contextual keywords.
    pub fn check_soft(&self, word: &str) -> bool {
        matches!(self.current_kind(), TokenKind::Ident(name) if name == word)
    }

    pub fn advance(&mut self) -> &'a Token {
        let token = self.current();
        match token.kind {
            TokenKind::Indent => self.indent_depth += 1,
            TokenKind::Dedent => self.indent_depth = self.indent_depth.saturating_sub(1),
            TokenKind::Eof => return token,
            _ => {}
        }
        trace!(kind = ?token.kind, "advance");
        self.pos += 1;
        token
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, kind: &TokenKind, code: ErrorCode) -> Result<Span, ParseError> {
        if self.check(kind) {
            Ok(self.advance().span)
        } else {
            Err(ParseError::expected(
                code,
                &kind.describe(),
                self.current_kind(),
                self.current_span(),
            ))
        }
    }

    pub fn expect_ident(&mut self) -> Result<Ident, ParseError> {
        if let TokenKind::Ident(name) = self.current_kind() {
            let span = self.advance().span;
            return Ok(Ident::new(name.clone(), span));
        }
        let err = ParseError::expected(
            ErrorCode::MissingIdentifier,
            "an identifier",
            self.current_kind(),
            self.current_span(),
        );
        if is_keyword(self.current_kind()) {
            return Err(ParseError {
                code: ErrorCode::ReservedKeyword,
                ..err
            }
            .with_hint("Keywords cannot be used as names"));
        }
        Err(err)
    }

    pub fn skip_newlines(&mut self) {
        while self.check(&TokenKind::Newline) {
            self.advance();
        }
    }

    fn token_at(&self, index: usize) -> &'a Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[index.min(last)]
    }
}

fn is_keyword(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::True
            | TokenKind::False
            | TokenKind::Null
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::Not
            | TokenKind::In
            | TokenKind::If
            | TokenKind::Else
            | TokenKind::For
            | TokenKind::While
            | TokenKind::Switch
            | TokenKind::Break
            | TokenKind::Continue
            | TokenKind::Return
            | TokenKind::Yield
            | TokenKind::Pass
            | TokenKind::Del
            | TokenKind::Defer
            | TokenKind::Errdefer
            | TokenKind::Fn
            | TokenKind::Catch
    )
}
