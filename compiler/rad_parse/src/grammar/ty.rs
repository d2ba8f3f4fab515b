//! Parameter lists and type annotations.

use rad_diagnostic::ErrorCode;
use rad_ir::ast::Param;
use rad_ir::{StructField, Type};

use super::{PResult, Parser};
use crate::token::TokenKind;
use crate::ParseError;

impl Parser<'_> {
    /// `(a, b: int, c?: str, d = 1, *rest: int[], *, named: bool)`
    pub(super) fn parse_params(&mut self) -> PResult<Vec<Param>> {
        self.expect(&TokenKind::LParen, ErrorCode::InvalidSyntax)?;
        let mut params: Vec<Param> = Vec::new();
        let mut named_only = false;
        while !self.check(&TokenKind::RParen) {
            let start = self.current_span();
            let variadic = self.eat(&TokenKind::Star);
            if variadic && (self.check(&TokenKind::Comma) || self.check(&TokenKind::RParen)) {
                named_only = true;
            } else {
                let name = self.cursor.expect_ident()?;
                if params.iter().any(|p| p.name.name == name.name) {
                    return Err(ParseError::new(
                        ErrorCode::InvalidSyntax,
                        format!("Duplicate parameter '{}'", name.name),
                        name.span,
                    ));
                }
                let mut optional = self.eat(&TokenKind::Question);
                let ty = if self.eat(&TokenKind::Colon) {
                    let ty = self.parse_type()?;
                    optional |= matches!(ty, Type::Optional(_));
                    Some(ty)
                } else {
                    None
                };
                let default = if self.eat(&TokenKind::Assign) {
                    Some(self.parse_expr()?)
                } else {
                    None
                };
                params.push(Param {
                    name,
                    ty,
                    default,
                    variadic,
                    named_only: named_only && !variadic,
                    optional,
                    span: start.merge(self.previous_span()),
                });
                if variadic {
                    named_only = true;
                }
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen, ErrorCode::MissingCloseParen)?;
        Ok(params)
    }

    /// `A|B`, each member a postfix type.
    pub(super) fn parse_type(&mut self) -> PResult<Type> {
        let first = self.parse_postfix_type()?;
        if !self.check(&TokenKind::Pipe) {
            return Ok(first);
        }
        let mut members = vec![first];
        while self.eat(&TokenKind::Pipe) {
            members.push(self.parse_postfix_type()?);
        }
        Ok(Type::Union(members))
    }

    /// `T`, `T[]`, `T?`
    fn parse_postfix_type(&mut self) -> PResult<Type> {
        let mut ty = self.parse_primary_type()?;
        loop {
            if self.check(&TokenKind::LBracket) && self.peek_kind_at(1) == &TokenKind::RBracket {
                self.advance();
                self.advance();
                ty = Type::List(Box::new(ty));
            } else if self.eat(&TokenKind::Question) {
                ty = Type::Optional(Box::new(ty));
            } else {
                return Ok(ty);
            }
        }
    }

    fn parse_primary_type(&mut self) -> PResult<Type> {
        let span = self.current_span();
        match self.current_kind() {
            TokenKind::Ident(name) => {
                let ty = match name.as_str() {
                    "str" | "string" => Type::Str,
                    "int" => Type::Int,
                    "float" => Type::Float,
                    "bool" => Type::Bool,
                    "error" => Type::Error,
                    "any" => Type::Any,
                    "void" => Type::Void,
                    "num" => Type::num(),
                    "list" => Type::any_list(),
                    "map" => Type::any_map(),
                    "function" => Type::Fn,
                    other => {
                        return Err(ParseError::new(
                            ErrorCode::InvalidSyntax,
                            format!("Unknown type '{other}'"),
                            span,
                        )
                        .with_hint(
                            "Types are str, int, float, bool, error, any, void, num, list, map, fn",
                        ));
                    }
                };
                self.advance();
                Ok(ty)
            }
            TokenKind::Fn => {
                self.advance();
                Ok(Type::Fn)
            }
            TokenKind::Null => {
                self.advance();
                Ok(Type::Optional(Box::new(Type::Any)))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_type()?;
                self.expect(&TokenKind::RParen, ErrorCode::MissingCloseParen)?;
                Ok(inner)
            }
            TokenKind::LBracket => {
                self.advance();
                let ty = if matches!(self.current_kind(), TokenKind::Str { .. }) {
                    let mut values = vec![self.expect_plain_string()?];
                    while self.eat(&TokenKind::Comma) {
                        values.push(self.expect_plain_string()?);
                    }
                    Type::Enum(values)
                } else {
                    let mut elems = vec![self.parse_type()?];
                    while self.eat(&TokenKind::Comma) {
                        elems.push(self.parse_type()?);
                    }
                    Type::Tuple(elems)
                };
                self.expect(&TokenKind::RBracket, ErrorCode::MissingCloseBracket)?;
                Ok(ty)
            }
            TokenKind::LBrace => {
                self.advance();
                let ty = if matches!(self.current_kind(), TokenKind::Str { .. }) {
                    let mut fields = Vec::new();
                    while !self.check(&TokenKind::RBrace) {
                        let key = self.expect_plain_string()?;
                        let optional = self.eat(&TokenKind::Question);
                        self.expect(&TokenKind::Colon, ErrorCode::MissingColon)?;
                        let ty = self.parse_type()?;
                        fields.push(StructField { key, ty, optional });
                        if !self.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                    Type::Struct(fields)
                } else {
                    let key = self.parse_type()?;
                    self.expect(&TokenKind::Colon, ErrorCode::MissingColon)?;
                    let value = self.parse_type()?;
                    Type::Map(Box::new(key), Box::new(value))
                };
                self.expect(&TokenKind::RBrace, ErrorCode::MissingCloseBrace)?;
                Ok(ty)
            }
            _ => Err(self.error_here(ErrorCode::InvalidSyntax, "a type")),
        }
    }
}
