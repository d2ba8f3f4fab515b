//! Expression parsing.
//!
//! Precedence, lowest first: `catch` prefix, ternary, `??`, then the binary
//! operators by [`BinaryOp::precedence`] with unary `not` between `and` and
//! the comparisons, unary `-`/`+`, and postfix calls, indexing, and fields.

use std::rc::Rc;

use rad_diagnostic::ErrorCode;
use rad_ir::ast::{BinaryOp, Expr, ExprKind, ListComp, NamedArg, UnaryOp};
use rad_stack::ensure_sufficient_stack;

use super::{PResult, Parser};
use crate::token::TokenKind;
use crate::ParseError;

/// Precedence of unary `not`.
const NOT_PRECEDENCE: u8 = 3;

impl Parser<'_> {
    pub(crate) fn parse_expr(&mut self) -> PResult<Expr> {
        ensure_sufficient_stack(|| self.parse_expr_inner())
    }

    fn parse_expr_inner(&mut self) -> PResult<Expr> {
        if self.check(&TokenKind::Catch) && self.peek_kind_at(1) != &TokenKind::Colon {
            let start = self.advance();
            let inner = self.parse_expr()?;
            let span = start.merge(inner.span);
            return Ok(Expr::new(ExprKind::Catch(Box::new(inner)), span));
        }
        self.parse_ternary()
    }

    fn parse_ternary(&mut self) -> PResult<Expr> {
        let cond = self.parse_fallback()?;
        if !self.eat(&TokenKind::Question) {
            return Ok(cond);
        }
        let then = self.parse_expr()?;
        self.expect(&TokenKind::Colon, ErrorCode::MissingColon)
            .map_err(|err| err.with_hint("A ternary needs both branches: cond ? a : b"))?;
        let otherwise = self.parse_expr()?;
        let span = cond.span.merge(otherwise.span);
        Ok(Expr::new(
            ExprKind::Ternary {
                cond: Box::new(cond),
                then: Box::new(then),
                otherwise: Box::new(otherwise),
            },
            span,
        ))
    }

    fn parse_fallback(&mut self) -> PResult<Expr> {
        let mut left = self.parse_binary(1)?;
        while self.eat(&TokenKind::DoubleQuestion) {
            let right = self.parse_binary(1)?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Fallback {
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    fn parse_binary(&mut self, min_prec: u8) -> PResult<Expr> {
        let mut left = self.parse_not()?;
        while let Some((op, width)) = self.current_binary_op() {
            if op.precedence() < min_prec {
                break;
            }
            for _ in 0..width {
                self.advance();
            }
            let right = ensure_sufficient_stack(|| self.parse_binary(op.precedence() + 1))?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    /// Operator at the cursor and how many tokens it spans (`not in` is two).
    fn current_binary_op(&self) -> Option<(BinaryOp, usize)> {
        let op = match self.current_kind() {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Mod,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::NotEq,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::LtEq,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::GtEq,
            TokenKind::In => BinaryOp::In,
            TokenKind::Not if self.peek_kind_at(1) == &TokenKind::In => {
                return Some((BinaryOp::NotIn, 2));
            }
            TokenKind::And => BinaryOp::And,
            TokenKind::Or => BinaryOp::Or,
            _ => return None,
        };
        Some((op, 1))
    }

    fn parse_not(&mut self) -> PResult<Expr> {
        if self.check(&TokenKind::Not) {
            let start = self.advance();
            let operand = self.parse_binary(NOT_PRECEDENCE + 1)?;
            let span = start.merge(operand.span);
            return Ok(Expr::new(
                ExprKind::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        self.parse_unary()
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        let op = match self.current_kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Plus,
            _ => return self.parse_postfix(),
        };
        let start = self.advance();
        let operand = ensure_sufficient_stack(|| self.parse_unary())?;
        let span = start.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn parse_postfix(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.current_kind() {
                TokenKind::LParen => {
                    let (args, named) = self.parse_call_args()?;
                    let span = expr.span.merge(self.previous_span());
                    expr = Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                            named,
                        },
                        span,
                    );
                }
                TokenKind::LBracket => expr = self.parse_index(expr)?,
                TokenKind::Dot => {
                    self.advance();
                    let name = self.cursor.expect_ident()?;
                    if self.check(&TokenKind::LParen) {
                        let (args, named) = self.parse_call_args()?;
                        let span = expr.span.merge(self.previous_span());
                        expr = Expr::new(
                            ExprKind::MethodCall {
                                receiver: Box::new(expr),
                                method: name,
                                args,
                                named,
                            },
                            span,
                        );
                    } else {
                        let span = expr.span.merge(name.span);
                        expr = Expr::new(
                            ExprKind::Field {
                                base: Box::new(expr),
                                name,
                            },
                            span,
                        );
                    }
                }
                _ => return Ok(expr),
            }
        }
    }

    /// `(a, b, name=value)`
    fn parse_call_args(&mut self) -> PResult<(Vec<Expr>, Vec<NamedArg>)> {
        self.advance();
        let mut args = Vec::new();
        let mut named: Vec<NamedArg> = Vec::new();
        while !self.check(&TokenKind::RParen) {
            let is_named = matches!(self.current_kind(), TokenKind::Ident(_))
                && self.peek_kind_at(1) == &TokenKind::Assign;
            if is_named {
                let name = self.cursor.expect_ident()?;
                self.advance();
                let value = self.parse_expr()?;
                named.push(NamedArg { name, value });
            } else {
                let arg = self.parse_expr()?;
                if let Some(first_named) = named.first() {
                    return Err(ParseError::new(
                        ErrorCode::InvalidSyntax,
                        "Positional arguments cannot follow named arguments",
                        arg.span,
                    )
                    .with_hint(format!(
                        "Move this argument before '{}='",
                        first_named.name.name
                    )));
                }
                args.push(arg);
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen, ErrorCode::MissingCloseParen)?;
        Ok((args, named))
    }

    /// `[i]`, `[a:b]`, `[:b]`, `[a:]`
    fn parse_index(&mut self, base: Expr) -> PResult<Expr> {
        self.advance();
        let base_span = base.span;
        let base = Box::new(base);
        let kind = if self.eat(&TokenKind::Colon) {
            let end = self.parse_slice_bound()?;
            ExprKind::Slice {
                base,
                start: None,
                end,
            }
        } else {
            let first = self.parse_expr()?;
            if self.eat(&TokenKind::Colon) {
                let end = self.parse_slice_bound()?;
                ExprKind::Slice {
                    base,
                    start: Some(Box::new(first)),
                    end,
                }
            } else {
                ExprKind::Index {
                    base,
                    index: Box::new(first),
                }
            }
        };
        self.expect(&TokenKind::RBracket, ErrorCode::MissingCloseBracket)?;
        Ok(Expr::new(kind, base_span.merge(self.previous_span())))
    }

    fn parse_slice_bound(&mut self) -> PResult<Option<Box<Expr>>> {
        if self.check(&TokenKind::RBracket) {
            return Ok(None);
        }
        Ok(Some(Box::new(self.parse_expr()?)))
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        let span = self.current_span();
        let kind = match self.current_kind() {
            TokenKind::Int(n) => {
                self.advance();
                ExprKind::Int(*n)
            }
            TokenKind::Float(value) => {
                self.advance();
                ExprKind::Float {
                    value: *value,
                    scientific: false,
                }
            }
            TokenKind::Scientific(value) => {
                self.advance();
                ExprKind::Float {
                    value: *value,
                    scientific: true,
                }
            }
            TokenKind::Str { delim, raw } => {
                self.advance();
                ExprKind::Str(self.parse_string(raw, *delim, span)?)
            }
            TokenKind::True => {
                self.advance();
                ExprKind::Bool(true)
            }
            TokenKind::False => {
                self.advance();
                ExprKind::Bool(false)
            }
            TokenKind::Null => {
                self.advance();
                ExprKind::Null
            }
            TokenKind::Ident(name) => {
                self.advance();
                ExprKind::Ident(name.clone())
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen, ErrorCode::MissingCloseParen)?;
                return Ok(Expr::new(inner.kind, span.merge(self.previous_span())));
            }
            TokenKind::LBracket => return self.parse_list(),
            TokenKind::LBrace => return self.parse_map(),
            TokenKind::Fn => {
                let def = self.parse_fn_def(false)?;
                let span = def.span;
                return Ok(Expr::new(ExprKind::Lambda(Rc::new(def)), span));
            }
            TokenKind::Switch => {
                let switch = self.parse_switch()?;
                let span = switch.span;
                return Ok(Expr::new(ExprKind::Switch(Box::new(switch)), span));
            }
            TokenKind::Error(err) => {
                return Err(ParseError::new(ErrorCode::InvalidSyntax, err.message(), span));
            }
            _ => return Err(self.error_here(ErrorCode::MissingExpression, "an expression")),
        };
        Ok(Expr::new(kind, span))
    }

    /// `[a, b]` or `[expr for x in src [with ctx] [if cond]]`
    fn parse_list(&mut self) -> PResult<Expr> {
        let start = self.advance();
        let mut items = Vec::new();
        if !self.check(&TokenKind::RBracket) {
            let first = self.parse_expr()?;
            if self.eat(&TokenKind::For) {
                let vars = self.parse_loop_vars()?;
                self.expect(&TokenKind::In, ErrorCode::InvalidSyntax)?;
                let iter = self.parse_expr()?;
                let context = self.parse_loop_context()?;
                let cond = if self.eat(&TokenKind::If) {
                    Some(self.parse_expr()?)
                } else {
                    None
                };
                self.expect(&TokenKind::RBracket, ErrorCode::MissingCloseBracket)?;
                let comp = ListComp {
                    expr: first,
                    vars,
                    iter,
                    context,
                    cond,
                };
                return Ok(Expr::new(
                    ExprKind::ListComp(Box::new(comp)),
                    start.merge(self.previous_span()),
                ));
            }
            items.push(first);
            while self.eat(&TokenKind::Comma) {
                if self.check(&TokenKind::RBracket) {
                    break;
                }
                items.push(self.parse_expr()?);
            }
        }
        self.expect(&TokenKind::RBracket, ErrorCode::MissingCloseBracket)?;
        Ok(Expr::new(
            ExprKind::List(items),
            start.merge(self.previous_span()),
        ))
    }

    /// `{ key: value, ... }`
    fn parse_map(&mut self) -> PResult<Expr> {
        let start = self.advance();
        let mut entries = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let key = self.parse_expr()?;
            self.expect(&TokenKind::Colon, ErrorCode::MissingColon)?;
            let value = self.parse_expr()?;
            entries.push((key, value));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace, ErrorCode::MissingCloseBrace)?;
        Ok(Expr::new(
            ExprKind::Map(entries),
            start.merge(self.previous_span()),
        ))
    }
}
