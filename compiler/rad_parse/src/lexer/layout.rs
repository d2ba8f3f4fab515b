//! Indentation layout.
//!
//! Rewrites physical newlines into the tokens the parser reads:
//!
//! - one `Newline` per logical line that has tokens (blank and comment-only
//!   lines vanish),
//! - `Indent` before the first token of a line indented deeper than the
//!   enclosing block, and one `Dedent` per block closed,
//! - nothing at all for newlines inside `()`, `[]`, or `{}`.
//!
//! The stream always ends `Newline`, `Dedent`s, `Eof`. Interpolation
//! fragments are lexed without indentation tracking.

use rad_ir::Span;

use crate::token::{LexError, Token, TokenKind};

pub(super) fn layout(
    source: &str,
    base: u32,
    raw: Vec<Token>,
    eof: Span,
    track_indent: bool,
) -> Vec<Token> {
    let mut out = Vec::with_capacity(raw.len() + 8);
    let mut indents: Vec<usize> = vec![0];
    let mut depth = 0usize;
    let mut at_line_start = true;
    let mut line_has_tokens = false;

    for token in raw {
        if token.kind == TokenKind::Newline {
            if depth == 0 {
                if line_has_tokens {
                    out.push(token);
                    line_has_tokens = false;
                }
                at_line_start = true;
            }
            continue;
        }

        if at_line_start && track_indent {
            let width = indent_width(source, (token.span.start - base) as usize);
            let point = Span::point(token.span.start);
            let top = indents.last().copied().unwrap_or(0);
            if width > top {
                indents.push(width);
                out.push(Token::new(TokenKind::Indent, point));
            } else {
                while width < indents.last().copied().unwrap_or(0) {
                    indents.pop();
                    out.push(Token::new(TokenKind::Dedent, point));
                }
                if width != indents.last().copied().unwrap_or(0) {
                    indents.push(width);
                    out.push(Token::new(
                        TokenKind::Error(LexError::InconsistentIndent),
                        point,
                    ));
                }
            }
        }
        at_line_start = false;

        match token.kind {
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                depth = depth.saturating_sub(1);
            }
            _ => {}
        }
        line_has_tokens = true;
        out.push(token);
    }

    if line_has_tokens {
        out.push(Token::new(TokenKind::Newline, eof));
    }
    for _ in 1..indents.len() {
        out.push(Token::new(TokenKind::Dedent, eof));
    }
    out.push(Token::new(TokenKind::Eof, eof));
    out
}

/// Characters of leading whitespace on the line containing `offset`.
fn indent_width(source: &str, offset: usize) -> usize {
    let line_start = source
        .get(..offset)
        .and_then(|prefix| prefix.rfind('\n'))
        .map_or(0, |nl| nl + 1);
    source
        .get(line_start..offset)
        .map_or(0, |indent| indent.chars().count())
}
