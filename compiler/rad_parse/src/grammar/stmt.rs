//! Statement parsing.

use std::rc::Rc;

use rad_diagnostic::ErrorCode;
use rad_ir::ast::{
    BinaryOp, Block, Expr, ExprKind, FnBody, FnDef, ForLoop, Ident, IfBranch, PathSegment,
    ShellStmt, Stmt, StmtKind, Switch, SwitchBody, SwitchCase, Target,
};
use rad_stack::ensure_sufficient_stack;

use super::{PResult, Parser};
use crate::token::TokenKind;
use crate::ParseError;

impl Parser<'_> {
    pub(super) fn parse_stmt(&mut self) -> PResult<Stmt> {
        ensure_sufficient_stack(|| self.parse_stmt_inner())
    }

    fn parse_stmt_inner(&mut self) -> PResult<Stmt> {
        let start = self.current_span();
        if let Some(kind) = self.table_block_kind() {
            let block = self.parse_display(kind)?;
            return Ok(Stmt::new(StmtKind::Display(block), start.merge(self.previous_span())));
        }
        let kind = match self.current_kind() {
            TokenKind::If => self.parse_if()?,
            TokenKind::For => self.parse_for()?,
            TokenKind::While => {
                self.advance();
                let cond = if self.check(&TokenKind::Colon) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                let body = self.parse_block()?;
                StmtKind::While { cond, body }
            }
            TokenKind::Switch => StmtKind::Switch(self.parse_switch()?),
            TokenKind::Fn if matches!(self.peek_kind_at(1), TokenKind::Ident(_)) => {
                let def = self.parse_fn_def(true)?;
                if matches!(def.body, FnBody::Expr(_)) {
                    self.expect_stmt_end()?;
                }
                StmtKind::FnDef(Rc::new(def))
            }
            TokenKind::Defer | TokenKind::Errdefer => {
                let on_error_only = self.check(&TokenKind::Errdefer);
                let keyword = self.advance();
                let body = if self.check(&TokenKind::Colon) {
                    self.parse_block()?
                } else {
                    let stmt = self.parse_simple_stmt()?;
                    self.expect_stmt_end()?;
                    let span = stmt.span;
                    Block::new(vec![stmt], keyword.merge(span))
                };
                StmtKind::Defer {
                    on_error_only,
                    body,
                }
            }
            TokenKind::Indent => {
                return Err(ParseError::new(
                    ErrorCode::InvalidSyntax,
                    "Unexpected indentation",
                    start,
                ));
            }
            TokenKind::Ident(_) if self.starts_json_field() => self.parse_json_field()?,
            TokenKind::Ident(name) if name == "args" && self.peek_kind_at(1) == &TokenKind::Colon => {
                return Err(ParseError::new(
                    ErrorCode::InvalidSyntax,
                    "The 'args' block must be at the top level of the script",
                    start,
                ));
            }
            _ => return self.parse_line_stmt(),
        };
        Ok(Stmt::new(kind, start.merge(self.previous_span())))
    }

    fn parse_line_stmt(&mut self) -> PResult<Stmt> {
        let stmt = self.parse_simple_stmt()?;
        self.expect_stmt_end()?;
        Ok(stmt)
    }

    /// Statements that fit on one line and may appear as an `if` pre-statement.
    pub(super) fn parse_simple_stmt(&mut self) -> PResult<Stmt> {
        let start = self.current_span();
        let kind = match self.current_kind() {
            TokenKind::Break => {
                self.advance();
                StmtKind::Break
            }
            TokenKind::Continue => {
                self.advance();
                StmtKind::Continue
            }
            TokenKind::Pass => {
                self.advance();
                StmtKind::Pass
            }
            TokenKind::Return => {
                self.advance();
                StmtKind::Return(self.parse_value_list()?)
            }
            TokenKind::Yield => {
                self.advance();
                StmtKind::Yield(self.parse_value_list()?)
            }
            TokenKind::Del => {
                self.advance();
                let mut targets = vec![into_target(self.parse_expr()?)?];
                while self.eat(&TokenKind::Comma) {
                    targets.push(into_target(self.parse_expr()?)?);
                }
                StmtKind::Del(targets)
            }
            _ if self.at_shell_start() => StmtKind::Shell(self.parse_shell(Vec::new())?),
            _ => self.parse_assign_or_expr()?,
        };
        Ok(Stmt::new(kind, start.merge(self.previous_span())))
    }

    fn parse_value_list(&mut self) -> PResult<Vec<Expr>> {
        let mut values = Vec::new();
        if self.at_stmt_end() || self.check(&TokenKind::Semicolon) {
            return Ok(values);
        }
        values.push(self.parse_expr()?);
        while self.eat(&TokenKind::Comma) {
            values.push(self.parse_expr()?);
        }
        Ok(values)
    }

    fn parse_assign_or_expr(&mut self) -> PResult<StmtKind> {
        let first = self.parse_expr()?;

        if self.check(&TokenKind::Comma) || self.check(&TokenKind::Assign) {
            let mut lhs = vec![first];
            while self.eat(&TokenKind::Comma) {
                lhs.push(self.parse_expr()?);
            }
            self.expect(&TokenKind::Assign, ErrorCode::InvalidSyntax)?;
            let targets = lhs
                .into_iter()
                .map(into_target)
                .collect::<PResult<Vec<_>>>()?;

            if self.at_shell_start() {
                let mut names = Vec::with_capacity(targets.len());
                for target in targets {
                    if !target.segments.is_empty() {
                        return Err(ParseError::new(
                            ErrorCode::InvalidSyntax,
                            "Shell command results can only be assigned to plain names",
                            target.span,
                        ));
                    }
                    names.push(target.root);
                }
                if names.len() > 3 {
                    return Err(ParseError::new(
                        ErrorCode::InvalidSyntax,
                        "Shell commands produce at most 3 values: exit code, stdout, stderr",
                        self.previous_span(),
                    ));
                }
                return Ok(StmtKind::Shell(self.parse_shell(names)?));
            }

            let value = self.parse_expr()?;
            let catch = self.parse_catch_suffix()?;
            return Ok(StmtKind::Assign {
                targets,
                value,
                catch,
            });
        }

        let op = match self.current_kind() {
            TokenKind::PlusEq => Some(BinaryOp::Add),
            TokenKind::MinusEq => Some(BinaryOp::Sub),
            TokenKind::StarEq => Some(BinaryOp::Mul),
            TokenKind::SlashEq => Some(BinaryOp::Div),
            TokenKind::PercentEq => Some(BinaryOp::Mod),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let target = into_target(first)?;
            let value = self.parse_expr()?;
            return Ok(StmtKind::CompoundAssign { target, op, value });
        }

        if self.check(&TokenKind::PlusPlus) || self.check(&TokenKind::MinusMinus) {
            let increment = self.check(&TokenKind::PlusPlus);
            self.advance();
            return Ok(StmtKind::IncrDecr {
                target: into_target(first)?,
                increment,
            });
        }

        let catch = self.parse_catch_suffix()?;
        Ok(StmtKind::Expr { expr: first, catch })
    }

    /// Optional `catch:` block after an assignment or expression statement.
    fn parse_catch_suffix(&mut self) -> PResult<Option<Block>> {
        if self.check(&TokenKind::Catch) && self.peek_kind_at(1) == &TokenKind::Colon {
            self.advance();
            return Ok(Some(self.parse_block()?));
        }
        Ok(None)
    }

    fn at_shell_start(&self) -> bool {
        let mut n = 0;
        loop {
            match self.peek_kind_at(n) {
                TokenKind::Dollar => return true,
                TokenKind::Ident(word) if word == "quiet" || word == "confirm" => n += 1,
                _ => return false,
            }
        }
    }

    /// `[quiet] [confirm] $cmd [catch: block]`
    fn parse_shell(&mut self, targets: Vec<Ident>) -> PResult<ShellStmt> {
        let mut quiet = false;
        let mut confirm = false;
        loop {
            if self.check_soft("quiet") {
                quiet = true;
            } else if self.check_soft("confirm") {
                confirm = true;
            } else {
                break;
            }
            self.advance();
        }
        self.expect(&TokenKind::Dollar, ErrorCode::InvalidSyntax)?;
        let cmd = self.parse_expr()?;
        let catch = self.parse_catch_suffix()?;
        Ok(ShellStmt {
            targets,
            cmd,
            quiet,
            confirm,
            catch,
        })
    }

    fn parse_if(&mut self) -> PResult<StmtKind> {
        self.advance();
        let mut branches = vec![self.parse_if_branch()?];
        let mut otherwise = None;
        while self.check(&TokenKind::Else) {
            self.advance();
            if self.eat(&TokenKind::If) {
                branches.push(self.parse_if_branch()?);
            } else {
                otherwise = Some(self.parse_block()?);
                break;
            }
        }
        Ok(StmtKind::If {
            branches,
            otherwise,
        })
    }

    /// `[pre;] cond: block`
    fn parse_if_branch(&mut self) -> PResult<IfBranch> {
        let first = self.parse_simple_stmt()?;
        let (pre, cond) = if self.eat(&TokenKind::Semicolon) {
            (Some(Box::new(first)), self.parse_expr()?)
        } else {
            match first.kind {
                StmtKind::Expr { expr, catch: None } => (None, expr),
                _ => {
                    return Err(ParseError::new(
                        ErrorCode::MissingExpression,
                        "Expected a condition",
                        first.span,
                    )
                    .with_hint("Separate a statement from the condition with ';'"));
                }
            }
        };
        let body = self.parse_block()?;
        Ok(IfBranch { pre, cond, body })
    }

    fn parse_for(&mut self) -> PResult<StmtKind> {
        self.advance();
        let vars = self.parse_loop_vars()?;
        self.expect(&TokenKind::In, ErrorCode::InvalidSyntax)?;
        let iter = self.parse_expr()?;
        let context = self.parse_loop_context()?;
        let body = self.parse_block()?;
        Ok(StmtKind::For(ForLoop {
            vars,
            iter,
            context,
            body,
        }))
    }

    pub(super) fn parse_loop_vars(&mut self) -> PResult<Vec<Ident>> {
        let mut vars = vec![self.cursor.expect_ident()?];
        while self.eat(&TokenKind::Comma) {
            vars.push(self.cursor.expect_ident()?);
        }
        Ok(vars)
    }

    /// Optional `with name`.
    pub(super) fn parse_loop_context(&mut self) -> PResult<Option<Ident>> {
        if self.check_soft("with") {
            self.advance();
            return Ok(Some(self.cursor.expect_ident()?));
        }
        Ok(None)
    }

    /// `switch [expr]:` followed by `case`/`default` arms.
    pub(super) fn parse_switch(&mut self) -> PResult<Switch> {
        let start = self.advance();
        let discriminant = if self.check(&TokenKind::Colon) {
            Expr::new(ExprKind::Bool(true), start)
        } else {
            self.parse_expr()?
        };
        self.expect(&TokenKind::Colon, ErrorCode::MissingColon)?;
        self.expect(&TokenKind::Newline, ErrorCode::InvalidSyntax)?;
        self.expect(&TokenKind::Indent, ErrorCode::InvalidSyntax)
            .map_err(|err| err.with_hint("Indent the cases of the switch"))?;

        let mut cases = Vec::new();
        let mut default = None;
        while !self.check(&TokenKind::Dedent) && !self.is_at_end() {
            let case_start = self.current_span();
            if self.check_soft("case") {
                self.advance();
                let mut keys = vec![self.parse_expr()?];
                while self.eat(&TokenKind::Comma) {
                    keys.push(self.parse_expr()?);
                }
                let body = self.parse_switch_body()?;
                cases.push(SwitchCase {
                    keys,
                    body,
                    span: case_start.merge(self.previous_span()),
                });
            } else if self.check_soft("default") {
                self.advance();
                if default.is_some() {
                    return Err(ParseError::new(
                        ErrorCode::InvalidSyntax,
                        "A switch can only have one default",
                        case_start,
                    ));
                }
                default = Some(self.parse_switch_body()?);
            } else {
                return Err(self.error_here(ErrorCode::InvalidSyntax, "'case' or 'default'"));
            }
        }
        self.eat(&TokenKind::Dedent);
        Ok(Switch {
            discriminant,
            cases,
            default,
            span: start.merge(self.previous_span()),
        })
    }

    fn parse_switch_body(&mut self) -> PResult<SwitchBody> {
        if self.eat(&TokenKind::Arrow) {
            let mut values = vec![self.parse_expr()?];
            while self.eat(&TokenKind::Comma) {
                values.push(self.parse_expr()?);
            }
            self.expect_stmt_end()?;
            return Ok(SwitchBody::Values(values));
        }
        Ok(SwitchBody::Block(self.parse_block()?))
    }

    /// `fn [name](params) [-> type]` followed by `:` block or an expression.
    pub(super) fn parse_fn_def(&mut self, named: bool) -> PResult<FnDef> {
        let start = self.expect(&TokenKind::Fn, ErrorCode::InvalidSyntax)?;
        let name = if named {
            Some(self.cursor.expect_ident()?)
        } else {
            None
        };
        let params = self.parse_params()?;
        let return_type = if self.eat(&TokenKind::Arrow) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let body = if self.check(&TokenKind::Colon) {
            FnBody::Block(self.parse_block()?)
        } else {
            FnBody::Expr(self.parse_expr()?)
        };
        Ok(FnDef {
            name,
            params,
            return_type,
            body,
            span: start.merge(self.previous_span()),
        })
    }
}

/// Turn a parsed expression into an assignment target.
pub(super) fn into_target(expr: Expr) -> PResult<Target> {
    let span = expr.span;
    let mut segments = Vec::new();
    let mut current = expr;
    loop {
        match current.kind {
            ExprKind::Ident(name) => {
                segments.reverse();
                return Ok(Target {
                    root: Ident::new(name, current.span),
                    segments,
                    span,
                });
            }
            ExprKind::Index { base, index } => {
                segments.push(PathSegment::Index(*index));
                current = *base;
            }
            ExprKind::Field { base, name } => {
                segments.push(PathSegment::Field(name));
                current = *base;
            }
            _ => {
                return Err(ParseError::new(
                    ErrorCode::InvalidSyntax,
                    "Invalid assignment target",
                    current.span,
                ));
            }
        }
    }
}
