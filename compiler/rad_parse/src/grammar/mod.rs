//! Recursive descent parser for Rad.
//!
//! Statements are separated by `Newline` tokens and grouped into blocks by
//! `Indent`/`Dedent`. Errors inside a block are recorded and the parser
//! skips to the next statement at the same depth, so one pass reports as
//! many problems as it can.

mod args;
mod display;
mod expr;
mod json_path;
mod stmt;
mod string;
mod ty;

use rad_diagnostic::ErrorCode;
use rad_ir::ast::{Block, Program};
use rad_ir::Span;

use crate::cursor::Cursor;
use crate::token::{Comment, TokenKind, TokenList};
use crate::ParseError;

pub(crate) type PResult<T> = Result<T, ParseError>;

pub(crate) struct Parser<'a> {
    cursor: Cursor<'a>,
    comments: &'a [Comment],
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: &'a TokenList) -> Self {
        Parser {
            cursor: Cursor::new(&tokens.tokens),
            comments: &tokens.comments,
            errors: Vec::new(),
        }
    }

    // Cursor delegation

    #[inline]
    fn current_kind(&self) -> &'a TokenKind {
        self.cursor.current_kind()
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    #[inline]
    fn previous_span(&self) -> Span {
        self.cursor.previous_span()
    }

    #[inline]
    fn peek_kind_at(&self, n: usize) -> &'a TokenKind {
        self.cursor.peek_kind_at(n)
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    #[inline]
    fn check(&self, kind: &TokenKind) -> bool {
        self.cursor.check(kind)
    }

    #[inline]
    fn check_soft(&self, word: &str) -> bool {
        self.cursor.check_soft(word)
    }

    #[inline]
    fn advance(&mut self) -> Span {
        self.cursor.advance().span
    }

    #[inline]
    fn eat(&mut self, kind: &TokenKind) -> bool {
        self.cursor.eat(kind)
    }

    #[inline]
    fn expect(&mut self, kind: &TokenKind, code: ErrorCode) -> PResult<Span> {
        self.cursor.expect(kind, code)
    }

    fn error_here(&self, code: ErrorCode, what: &str) -> ParseError {
        ParseError::expected(code, what, self.current_kind(), self.current_span())
    }

    /// Parse a whole script.
    pub(crate) fn parse_program(mut self, description: Option<String>) -> (Program, Vec<ParseError>) {
        let mut program = Program {
            description,
            ..Program::default()
        };
        self.cursor.skip_newlines();
        while !self.is_at_end() {
            if self.check_soft("args") && self.peek_kind_at(1) == &TokenKind::Colon {
                let start = self.current_span();
                match self.parse_arg_block() {
                    Ok(block) if program.args.is_none() => program.args = Some(block),
                    Ok(_) => self.errors.push(ParseError::new(
                        ErrorCode::InvalidSyntax,
                        "Only one 'args' block is allowed",
                        start,
                    )),
                    Err(err) => {
                        self.errors.push(err);
                        self.recover(0);
                    }
                }
            } else {
                match self.parse_stmt() {
                    Ok(stmt) => program.stmts.push(stmt),
                    Err(err) => {
                        self.errors.push(err);
                        self.recover(0);
                    }
                }
            }
            self.cursor.skip_newlines();
            // Stray dedents from inconsistent indentation.
            while self.eat(&TokenKind::Dedent) {}
        }
        (program, self.errors)
    }

    /// `:` followed by an indented block or a single statement on the same line.
    fn parse_block(&mut self) -> PResult<Block> {
        let colon = self
            .expect(&TokenKind::Colon, ErrorCode::MissingColon)
            .map_err(|err| err.with_hint("Block headers end with ':'"))?;
        self.parse_block_body(colon)
    }

    fn parse_block_body(&mut self, start: Span) -> PResult<Block> {
        if !self.check(&TokenKind::Newline) {
            let stmt = self.parse_stmt()?;
            let span = start.merge(stmt.span);
            return Ok(Block::new(vec![stmt], span));
        }
        self.advance();
        if !self.check(&TokenKind::Indent) {
            return Err(self
                .error_here(ErrorCode::InvalidSyntax, "an indented block")
                .with_hint("Indent the statements that belong to this block"));
        }
        self.advance();
        let depth = self.cursor.indent_depth();
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::Dedent) && !self.is_at_end() {
            match self.parse_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(err) => {
                    self.errors.push(err);
                    self.recover(depth);
                }
            }
        }
        self.eat(&TokenKind::Dedent);
        Ok(Block::new(stmts, start.merge(self.previous_span())))
    }

    /// Terminates a simple statement: a newline, or the end of a block that
    /// the statement itself ended with (`x = fn():` bodies, `catch:` blocks).
    fn expect_stmt_end(&mut self) -> PResult<()> {
        match self.current_kind() {
            TokenKind::Newline => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof | TokenKind::Dedent => Ok(()),
            _ if self.cursor.previous_kind() == Some(&TokenKind::Dedent) => Ok(()),
            found => Err(ParseError::new(
                ErrorCode::UnexpectedToken,
                format!("Unexpected {}", found.describe()),
                self.current_span(),
            )),
        }
    }

    fn at_stmt_end(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::Newline | TokenKind::Eof | TokenKind::Dedent
        )
    }

    /// Skip to the start of the next statement in the block at `depth`,
    /// including any block hanging off the broken line.
    fn recover(&mut self, depth: usize) {
        loop {
            let current = self.cursor.indent_depth();
            match self.current_kind() {
                TokenKind::Eof => return,
                TokenKind::Newline if current <= depth => {
                    self.advance();
                    if !self.check(&TokenKind::Indent) {
                        return;
                    }
                }
                TokenKind::Dedent if current <= depth => return,
                TokenKind::Dedent if current == depth + 1 => {
                    self.advance();
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// `# comment` at the end of the line being parsed.
    fn trailing_comment(&self) -> Option<String> {
        let after = self.previous_span().end;
        let before = self.current_span().start.max(after);
        self.comments
            .iter()
            .find(|c| c.span.start >= after && c.span.end <= before)
            .map(|c| c.text.clone())
    }
}

#[cfg(test)]
mod tests;
