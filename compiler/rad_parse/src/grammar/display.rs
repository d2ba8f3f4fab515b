//! Table blocks: `display`, `rad` and `request`.
//!
//! ```text
//! display [source]:
//!     fields name, age
//!     sort age desc, name
//!     age:
//!         filter fn(a) a >= 18
//!         map a -> a * 12
//!         color "red" "^1"
//! ```
//!
//! `rad <url>:` and `request <url>:` share the same body.

use std::rc::Rc;

use rad_diagnostic::ErrorCode;
use rad_ir::ast::{
    ColumnOp, DisplayBlock, Expr, ExprKind, FieldModifier, FnBody, FnDef, Ident, Param, SortKey,
    TableKind,
};

use super::{PResult, Parser};
use crate::token::TokenKind;
use crate::ParseError;

impl Parser<'_> {
    /// The kind of table block starting at the cursor, if any. A table
    /// keyword used as a plain variable does not start one.
    pub(super) fn table_block_kind(&self) -> Option<TableKind> {
        let TokenKind::Ident(word) = self.current_kind() else {
            return None;
        };
        let kind = TableKind::from_keyword(word)?;
        self.starts_table_block().then_some(kind)
    }

    fn starts_table_block(&self) -> bool {
        !matches!(
            self.peek_kind_at(1),
            TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::Dot
                | TokenKind::Assign
                | TokenKind::Comma
                | TokenKind::Newline
                | TokenKind::Eof
        ) && !self.operator_at(1)
    }

    fn operator_at(&self, n: usize) -> bool {
        matches!(
            self.peek_kind_at(n),
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::EqEq
                | TokenKind::NotEq
                | TokenKind::Lt
                | TokenKind::LtEq
                | TokenKind::Gt
                | TokenKind::GtEq
                | TokenKind::In
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::PlusEq
                | TokenKind::MinusEq
                | TokenKind::StarEq
                | TokenKind::SlashEq
                | TokenKind::PercentEq
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
                | TokenKind::Question
                | TokenKind::DoubleQuestion
        )
    }

    pub(super) fn parse_display(&mut self, kind: TableKind) -> PResult<DisplayBlock> {
        let start = self.advance();
        let source = if self.check(&TokenKind::Colon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::Colon, ErrorCode::MissingColon)?;
        self.expect(&TokenKind::Newline, ErrorCode::InvalidSyntax)?;
        self.expect(&TokenKind::Indent, ErrorCode::InvalidSyntax)?;

        let mut fields = Vec::new();
        let mut modifiers = Vec::new();
        let mut sorts = Vec::new();
        while !self.check(&TokenKind::Dedent) && !self.is_at_end() {
            let is_header = matches!(
                self.peek_kind_at(1),
                TokenKind::Colon | TokenKind::Comma
            );
            if self.check_soft("fields") && !is_header {
                self.advance();
                fields.extend(self.parse_ident_list()?);
                self.expect_stmt_end()?;
            } else if self.check_soft("sort") && !is_header {
                self.advance();
                sorts.extend(self.parse_sort_keys()?);
                self.expect_stmt_end()?;
            } else if matches!(self.current_kind(), TokenKind::Ident(_)) {
                let names = self.parse_ident_list()?;
                self.expect(&TokenKind::Colon, ErrorCode::MissingColon)?;
                let ops = self.parse_column_ops()?;
                modifiers.push(FieldModifier { fields: names, ops });
            } else {
                return Err(self.error_here(
                    ErrorCode::InvalidSyntax,
                    "'fields', 'sort', or a field name",
                ));
            }
        }
        self.eat(&TokenKind::Dedent);

        if fields.is_empty() {
            return Err(ParseError::new(
                ErrorCode::InvalidSyntax,
                format!("A {} block needs a 'fields' line", kind.keyword()),
                start,
            ));
        }
        Ok(DisplayBlock {
            kind,
            source,
            fields,
            modifiers,
            sorts,
            span: start.merge(self.previous_span()),
        })
    }

    fn parse_ident_list(&mut self) -> PResult<Vec<Ident>> {
        let mut names = vec![self.cursor.expect_ident()?];
        while self.eat(&TokenKind::Comma) {
            names.push(self.cursor.expect_ident()?);
        }
        Ok(names)
    }

    /// `sort`, `sort desc`, `sort a, b desc`
    fn parse_sort_keys(&mut self) -> PResult<Vec<SortKey>> {
        if self.at_stmt_end() {
            return Ok(vec![SortKey {
                field: None,
                descending: false,
            }]);
        }
        if let Some(descending) = self.sort_direction() {
            self.advance();
            return Ok(vec![SortKey {
                field: None,
                descending,
            }]);
        }
        let mut keys = Vec::new();
        loop {
            let field = self.cursor.expect_ident()?;
            let descending = match self.sort_direction() {
                Some(descending) => {
                    self.advance();
                    descending
                }
                None => false,
            };
            keys.push(SortKey {
                field: Some(field),
                descending,
            });
            if !self.eat(&TokenKind::Comma) {
                return Ok(keys);
            }
        }
    }

    fn sort_direction(&self) -> Option<bool> {
        if self.check_soft("asc") {
            Some(false)
        } else if self.check_soft("desc") {
            Some(true)
        } else {
            None
        }
    }

    fn parse_column_ops(&mut self) -> PResult<Vec<ColumnOp>> {
        self.expect(&TokenKind::Newline, ErrorCode::InvalidSyntax)?;
        self.expect(&TokenKind::Indent, ErrorCode::InvalidSyntax)?;
        let mut ops = Vec::new();
        while !self.check(&TokenKind::Dedent) && !self.is_at_end() {
            let op = if self.check_soft("map") {
                self.advance();
                ColumnOp::Map(self.parse_column_fn()?)
            } else if self.check_soft("filter") {
                self.advance();
                ColumnOp::Filter(self.parse_column_fn()?)
            } else if self.check_soft("color") {
                self.advance();
                let color = self.parse_expr()?;
                let pattern = self.parse_expr()?;
                ColumnOp::Color { color, pattern }
            } else {
                return Err(self.error_here(ErrorCode::InvalidSyntax, "'map', 'filter', or 'color'"));
            };
            ops.push(op);
            self.expect_stmt_end()?;
        }
        self.eat(&TokenKind::Dedent);
        Ok(ops)
    }

    /// A function expression, or the `x -> expr` shorthand.
    fn parse_column_fn(&mut self) -> PResult<Expr> {
        if !(matches!(self.current_kind(), TokenKind::Ident(_))
            && self.peek_kind_at(1) == &TokenKind::Arrow)
        {
            return self.parse_expr();
        }
        let name = self.cursor.expect_ident()?;
        self.advance();
        let body = self.parse_expr()?;
        let span = name.span.merge(body.span);
        let param = Param {
            span: name.span,
            name,
            ty: None,
            default: None,
            variadic: false,
            named_only: false,
            optional: false,
        };
        let def = FnDef {
            name: None,
            params: vec![param],
            return_type: None,
            body: FnBody::Expr(body),
            span,
        };
        Ok(Expr::new(ExprKind::Lambda(Rc::new(def)), span))
    }
}
