//! The `args:` block.
//!
//! Each line is either a declaration
//! (`name ["flag-name"] [s] type[?] [= default] [# description]`,
//! `*name type`) or a constraint on a declared argument
//! (`name enum [...]`, `name regex "..."`, `name range [a, b)`,
//! `a [mutually] requires|excludes b, c`).

use rad_diagnostic::ErrorCode;
use rad_ir::ast::{ArgBlock, ArgConstraint, ArgDecl, ArgScalar, ArgType, Ident, RangeBound};

use super::{PResult, Parser};
use crate::token::TokenKind;
use crate::ParseError;

enum ArgLine {
    Decl(ArgDecl),
    Constraint(ArgConstraint),
}

const CONSTRAINT_WORDS: &[&str] = &["enum", "regex", "range", "requires", "excludes", "mutually"];

impl Parser<'_> {
    pub(super) fn parse_arg_block(&mut self) -> PResult<ArgBlock> {
        let start = self.advance();
        self.expect(&TokenKind::Colon, ErrorCode::MissingColon)?;
        self.expect(&TokenKind::Newline, ErrorCode::InvalidSyntax)?;
        self.expect(&TokenKind::Indent, ErrorCode::InvalidSyntax)
            .map_err(|err| err.with_hint("Indent each argument under 'args:'"))?;
        let depth = self.cursor.indent_depth();

        let mut block = ArgBlock {
            decls: Vec::new(),
            constraints: Vec::new(),
            span: start,
        };
        while !self.check(&TokenKind::Dedent) && !self.is_at_end() {
            match self.parse_arg_line() {
                Ok(ArgLine::Decl(decl)) => {
                    if block.decl(&decl.name.name).is_some() {
                        self.errors.push(ParseError::new(
                            ErrorCode::InvalidSyntax,
                            format!("Argument '{}' is declared twice", decl.name.name),
                            decl.name.span,
                        ));
                    }
                    block.decls.push(decl);
                }
                Ok(ArgLine::Constraint(constraint)) => block.constraints.push(constraint),
                Err(err) => {
                    self.errors.push(err);
                    self.recover(depth);
                }
            }
        }
        self.eat(&TokenKind::Dedent);
        block.span = start.merge(self.previous_span());
        Ok(block)
    }

    fn parse_arg_line(&mut self) -> PResult<ArgLine> {
        let start = self.current_span();
        let variadic = self.eat(&TokenKind::Star);
        let name = self.cursor.expect_ident()?;

        if !variadic && CONSTRAINT_WORDS.iter().any(|w| self.check_soft(w)) {
            let constraint = self.parse_constraint(name)?;
            self.expect_stmt_end()?;
            return Ok(ArgLine::Constraint(constraint));
        }

        let rename = if matches!(self.current_kind(), TokenKind::Str { .. }) {
            Some(self.expect_plain_string()?)
        } else {
            None
        };
        let short = match self.current_kind() {
            TokenKind::Ident(s)
                if s.chars().count() == 1 && matches!(self.peek_kind_at(1), TokenKind::Ident(_)) =>
            {
                self.advance();
                s.chars().next()
            }
            _ => None,
        };
        let ty = self.parse_arg_type()?;
        let optional = self.eat(&TokenKind::Question);
        let default = if self.eat(&TokenKind::Assign) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let span = start.merge(self.previous_span());
        let comment = self.trailing_comment();
        self.expect_stmt_end()?;
        Ok(ArgLine::Decl(ArgDecl {
            name,
            rename,
            short,
            ty,
            optional,
            variadic,
            default,
            comment,
            span,
        }))
    }

    /// `str`, `int[]`, ... (`string` is accepted for `str`).
    fn parse_arg_type(&mut self) -> PResult<ArgType> {
        let span = self.current_span();
        let scalar = match self.current_kind() {
            TokenKind::Ident(name) => match name.as_str() {
                "str" | "string" => ArgScalar::Str,
                "int" => ArgScalar::Int,
                "float" => ArgScalar::Float,
                "bool" => ArgScalar::Bool,
                other => {
                    return Err(ParseError::new(
                        ErrorCode::InvalidSyntax,
                        format!("Invalid argument type '{other}'"),
                        span,
                    )
                    .with_hint("Argument types are str, int, float, bool, or a list of them like str[]"));
                }
            },
            _ => return Err(self.error_here(ErrorCode::InvalidSyntax, "an argument type")),
        };
        self.advance();
        let list = self.check(&TokenKind::LBracket) && self.peek_kind_at(1) == &TokenKind::RBracket;
        if list {
            self.advance();
            self.advance();
        }
        Ok(ArgType { scalar, list })
    }

    fn parse_constraint(&mut self, arg: Ident) -> PResult<ArgConstraint> {
        if self.check_soft("enum") {
            self.advance();
            self.expect(&TokenKind::LBracket, ErrorCode::InvalidSyntax)?;
            let mut values = Vec::new();
            while !self.check(&TokenKind::RBracket) {
                values.push(self.expect_plain_string()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RBracket, ErrorCode::MissingCloseBracket)?;
            return Ok(ArgConstraint::Enum { arg, values });
        }
        if self.check_soft("regex") {
            self.advance();
            let pattern = self.expect_plain_string()?;
            return Ok(ArgConstraint::Regex { arg, pattern });
        }
        if self.check_soft("range") {
            self.advance();
            return self.parse_range(arg);
        }

        let mutual = self.check_soft("mutually");
        if mutual {
            self.advance();
        }
        let requires = if self.check_soft("requires") {
            true
        } else if self.check_soft("excludes") {
            false
        } else {
            return Err(self.error_here(ErrorCode::InvalidSyntax, "'requires' or 'excludes'"));
        };
        self.advance();
        let mut others = vec![self.cursor.expect_ident()?];
        while self.eat(&TokenKind::Comma) {
            others.push(self.cursor.expect_ident()?);
        }
        Ok(if requires {
            ArgConstraint::Requires {
                arg,
                others,
                mutual,
            }
        } else {
            ArgConstraint::Excludes {
                arg,
                others,
                mutual,
            }
        })
    }

    /// `[min, max]` inclusive, `(min, max)` exclusive, mixed, either side empty.
    fn parse_range(&mut self, arg: Ident) -> PResult<ArgConstraint> {
        let min_inclusive = if self.eat(&TokenKind::LBracket) {
            true
        } else if self.eat(&TokenKind::LParen) {
            false
        } else {
            return Err(self.error_here(ErrorCode::InvalidSyntax, "'[' or '('"));
        };
        let min = if self.check(&TokenKind::Comma) {
            None
        } else {
            Some(RangeBound {
                value: self.parse_number()?,
                inclusive: min_inclusive,
            })
        };
        self.expect(&TokenKind::Comma, ErrorCode::InvalidSyntax)?;
        let max_value = if self.check(&TokenKind::RBracket) || self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_number()?)
        };
        let max_inclusive = if self.eat(&TokenKind::RBracket) {
            true
        } else if self.eat(&TokenKind::RParen) {
            false
        } else {
            return Err(self.error_here(ErrorCode::InvalidSyntax, "']' or ')'"));
        };
        if min.is_none() && max_value.is_none() {
            return Err(ParseError::new(
                ErrorCode::InvalidSyntax,
                "A range needs at least one bound",
                arg.span,
            ));
        }
        Ok(ArgConstraint::Range {
            arg,
            min,
            max: max_value.map(|value| RangeBound {
                value,
                inclusive: max_inclusive,
            }),
        })
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "range bounds are compared as floats"
    )]
    fn parse_number(&mut self) -> PResult<f64> {
        let negative = self.eat(&TokenKind::Minus);
        let value = match self.current_kind() {
            TokenKind::Int(n) => *n as f64,
            TokenKind::Float(v) | TokenKind::Scientific(v) => *v,
            _ => return Err(self.error_here(ErrorCode::InvalidSyntax, "a number")),
        };
        self.advance();
        Ok(if negative { -value } else { value })
    }
}
