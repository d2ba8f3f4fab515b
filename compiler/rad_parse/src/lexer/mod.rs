//! Lexer for Rad using logos.
//!
//! Raw tokens come from a logos-derived [`RawToken`]; the [`layout`] pass then
//! turns physical newlines and leading whitespace into `Newline`, `Indent`,
//! and `Dedent` tokens for the parser.

mod layout;

use logos::{Lexer, Logos};
use rad_ir::Span;
use tracing::trace;

use crate::token::{Comment, LexError, Token, TokenKind, TokenList};

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"\\[ \t]*\r?\n")]
enum RawToken {
    #[regex(r"#[^\n]*")]
    HashComment,

    #[token("\n")]
    Newline,

    // Keywords
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,
    #[token("in")]
    In,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("while")]
    While,
    #[token("switch")]
    Switch,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("return")]
    Return,
    #[token("yield")]
    Yield,
    #[token("pass")]
    Pass,
    #[token("del")]
    Del,
    #[token("defer")]
    Defer,
    #[token("errdefer")]
    Errdefer,
    #[token("fn")]
    Fn,
    #[token("catch")]
    Catch,

    // Literals
    #[regex(r"[0-9][0-9_]*", lex_int)]
    Int(i64),
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*", lex_float)]
    Float(f64),
    #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?[eE][+-]?[0-9]+", lex_float)]
    Scientific(f64),
    #[token("\"", |lex| lex_string(lex, b'"'))]
    #[token("'", |lex| lex_string(lex, b'\''))]
    #[token("`", |lex| lex_string(lex, b'`'))]
    Str(char),
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token("->")]
    Arrow,
    #[token("?")]
    Question,
    #[token("??")]
    DoubleQuestion,
    #[token("|")]
    Pipe,
    #[token("$")]
    Dollar,

    // Operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("=")]
    Assign,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
}

fn lex_int(lex: &mut Lexer<RawToken>) -> Result<i64, LexError> {
    let digits: String = lex.slice().chars().filter(|c| *c != '_').collect();
    digits.parse().map_err(|_| LexError::IntegerOverflow)
}

fn lex_float(lex: &mut Lexer<RawToken>) -> Result<f64, LexError> {
    let digits: String = lex.slice().chars().filter(|c| *c != '_').collect();
    digits.parse().map_err(|_| LexError::InvalidNumber)
}

/// Consume a string body after its opening delimiter.
fn lex_string(lex: &mut Lexer<RawToken>, delim: u8) -> Result<char, LexError> {
    let rest = lex.remainder();
    if let Some(len) = string_body_len(rest, delim) {
        lex.bump(len + 1);
        Ok(char::from(delim))
    } else {
        lex.bump(rest.find('\n').unwrap_or(rest.len()));
        Err(LexError::UnterminatedString)
    }
}

/// Byte length of a string body up to its closing `delim`.
///
/// Interpolations may hold nested strings with any delimiter. Only backtick
/// strings may span lines.
pub(crate) fn string_body_len(text: &str, delim: u8) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            b'{' => depth += 1,
            b'}' if depth > 0 => depth -= 1,
            b if b == delim && depth == 0 => return Some(i),
            quote @ (b'"' | b'\'' | b'`') if depth > 0 => {
                let inner = string_body_len(&text[i + 1..], quote)?;
                i += inner + 2;
                continue;
            }
            b'\n' if depth == 0 && delim != b'`' => return None,
            _ => {}
        }
        i += 1;
    }
    None
}

/// Offset of the `}` closing an interpolation whose `{` precedes `text`.
pub(crate) fn interpolation_end(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 1usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            quote @ (b'"' | b'\'' | b'`') => {
                let inner = string_body_len(&text[i + 1..], quote)?;
                i += inner + 2;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Lex a whole script.
pub fn lex(source: &str) -> TokenList {
    lex_at(source, 0, true)
}

/// Lex the expression inside a `{...}` interpolation starting at byte `base`.
pub(crate) fn lex_fragment(source: &str, base: u32) -> TokenList {
    lex_at(source, base, false)
}

fn lex_at(source: &str, base: u32, track_indent: bool) -> TokenList {
    let mut raw_tokens = Vec::new();
    let mut comments = Vec::new();
    let mut logos = RawToken::lexer(source);

    while let Some(result) = logos.next() {
        let span = Span::from_range(logos.span()).shifted(base);
        let slice = logos.slice();
        let kind = match result {
            Ok(RawToken::HashComment) => {
                comments.push(Comment {
                    text: slice.trim_start_matches('#').trim().to_owned(),
                    span,
                });
                continue;
            }
            Ok(raw) => convert(raw, slice),
            Err(err) => TokenKind::Error(err),
        };
        raw_tokens.push(Token::new(kind, span));
    }

    let end = u32::try_from(source.len()).unwrap_or(u32::MAX);
    let eof = Span::point(end).shifted(base);
    let tokens = layout::layout(source, base, raw_tokens, eof, track_indent);
    trace!(count = tokens.len(), comments = comments.len(), "lexed");
    TokenList { tokens, comments }
}

fn convert(raw: RawToken, slice: &str) -> TokenKind {
    match raw {
        RawToken::Int(n) => TokenKind::Int(n),
        RawToken::Float(v) => TokenKind::Float(v),
        RawToken::Scientific(v) => TokenKind::Scientific(v),
        RawToken::Str(delim) => TokenKind::Str {
            delim,
            raw: slice
                .get(1..slice.len().saturating_sub(1))
                .unwrap_or_default()
                .to_owned(),
        },
        RawToken::Ident => TokenKind::Ident(slice.to_owned()),
        RawToken::Newline => TokenKind::Newline,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Null => TokenKind::Null,
        RawToken::And => TokenKind::And,
        RawToken::Or => TokenKind::Or,
        RawToken::Not => TokenKind::Not,
        RawToken::In => TokenKind::In,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::For => TokenKind::For,
        RawToken::While => TokenKind::While,
        RawToken::Switch => TokenKind::Switch,
        RawToken::Break => TokenKind::Break,
        RawToken::Continue => TokenKind::Continue,
        RawToken::Return => TokenKind::Return,
        RawToken::Yield => TokenKind::Yield,
        RawToken::Pass => TokenKind::Pass,
        RawToken::Del => TokenKind::Del,
        RawToken::Defer => TokenKind::Defer,
        RawToken::Errdefer => TokenKind::Errdefer,
        RawToken::Fn => TokenKind::Fn,
        RawToken::Catch => TokenKind::Catch,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::Question => TokenKind::Question,
        RawToken::DoubleQuestion => TokenKind::DoubleQuestion,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::Dollar => TokenKind::Dollar,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Assign => TokenKind::Assign,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::PlusEq => TokenKind::PlusEq,
        RawToken::MinusEq => TokenKind::MinusEq,
        RawToken::StarEq => TokenKind::StarEq,
        RawToken::SlashEq => TokenKind::SlashEq,
        RawToken::PercentEq => TokenKind::PercentEq,
        RawToken::PlusPlus => TokenKind::PlusPlus,
        RawToken::MinusMinus => TokenKind::MinusMinus,
        // Collected by the caller.
        RawToken::HashComment => TokenKind::Error(LexError::UnexpectedChar),
    }
}

#[cfg(test)]
mod tests;
