//! JSON field declarations: `Name = json.items[].name`.

use rad_diagnostic::ErrorCode;
use rad_ir::ast::{JsonIndex, JsonKey, JsonPath, JsonSegment, StmtKind};

use super::{PResult, Parser};
use crate::token::TokenKind;

impl Parser<'_> {
    /// `name = json` followed by a path or the end of the line.
    pub(super) fn starts_json_field(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Ident(_))
            && self.peek_kind_at(1) == &TokenKind::Assign
            && matches!(self.peek_kind_at(2), TokenKind::Ident(word) if word == "json")
            && matches!(
                self.peek_kind_at(3),
                TokenKind::Dot
                    | TokenKind::LBracket
                    | TokenKind::Newline
                    | TokenKind::Eof
                    | TokenKind::Dedent
            )
    }

    pub(super) fn parse_json_field(&mut self) -> PResult<StmtKind> {
        let name = self.cursor.expect_ident()?;
        self.expect(&TokenKind::Assign, ErrorCode::InvalidSyntax)?;
        let root = self.advance();
        let indexes = self.parse_json_indexes()?;
        let mut segments = vec![JsonSegment {
            key: JsonKey::Root,
            indexes,
            span: root.merge(self.previous_span()),
        }];
        while self.eat(&TokenKind::Dot) {
            let start = self.current_span();
            let key = match self.current_kind() {
                TokenKind::Star => JsonKey::AnyKey,
                TokenKind::Ident(key) => JsonKey::Name(key.clone()),
                _ => return Err(self.error_here(ErrorCode::MissingIdentifier, "a JSON key or '*'")),
            };
            self.advance();
            let indexes = self.parse_json_indexes()?;
            segments.push(JsonSegment {
                key,
                indexes,
                span: start.merge(self.previous_span()),
            });
        }
        let path = JsonPath {
            segments,
            span: root.merge(self.previous_span()),
        };
        self.expect_stmt_end()?;
        Ok(StmtKind::JsonField { name, path })
    }

    fn parse_json_indexes(&mut self) -> PResult<Vec<JsonIndex>> {
        let mut indexes = Vec::new();
        while self.eat(&TokenKind::LBracket) {
            if self.eat(&TokenKind::RBracket) {
                indexes.push(JsonIndex::Each);
                continue;
            }
            let index = self.parse_expr()?;
            self.expect(&TokenKind::RBracket, ErrorCode::MissingCloseBracket)?;
            indexes.push(JsonIndex::At(index));
        }
        Ok(indexes)
    }
}
