//! String literals: escapes and `{expr:fmt}` interpolation.

use rad_diagnostic::ErrorCode;
use rad_ir::ast::{Align, Expr, FormatSpec, StringPart};
use rad_ir::Span;

use super::{PResult, Parser};
use crate::lexer::{interpolation_end, lex_fragment};
use crate::token::TokenKind;
use crate::ParseError;

impl Parser<'_> {
    /// Split a string body into text and interpolations. `span` covers the
    /// whole literal including its delimiters.
    pub(super) fn parse_string(
        &mut self,
        raw: &str,
        delim: char,
        span: Span,
    ) -> PResult<Vec<StringPart>> {
        let body_start = span.start + 1;
        let mut parts = Vec::new();
        let mut text = String::new();
        let mut chars = raw.char_indices();

        while let Some((i, ch)) = chars.next() {
            match ch {
                '\\' => match chars.next() {
                    Some((_, 'n')) => text.push('\n'),
                    Some((_, 't')) => text.push('\t'),
                    Some((_, 'r')) => text.push('\r'),
                    Some((_, '\\')) => text.push('\\'),
                    Some((_, '{')) => text.push('{'),
                    Some((_, c)) if c == delim => text.push(c),
                    Some((_, c)) => {
                        text.push('\\');
                        text.push(c);
                    }
                    None => text.push('\\'),
                },
                '{' => {
                    let inner_start = i + 1;
                    let Some(len) = interpolation_end(&raw[inner_start..]) else {
                        return Err(ParseError::new(
                            ErrorCode::MissingCloseBrace,
                            "Unclosed '{' in string interpolation",
                            Span::point(body_start + offset(i)),
                        )
                        .with_hint("Write '\\{' for a literal brace"));
                    };
                    let inner = &raw[inner_start..inner_start + len];
                    // skip past the closing brace
                    for _ in inner.chars() {
                        chars.next();
                    }
                    chars.next();

                    if inner.trim().is_empty() {
                        text.push('{');
                        text.push_str(inner);
                        text.push('}');
                        continue;
                    }
                    if !text.is_empty() {
                        parts.push(StringPart::Text(std::mem::take(&mut text)));
                    }
                    let (expr_text, format) = split_format(inner);
                    let expr = self.parse_fragment(expr_text, body_start + offset(inner_start))?;
                    parts.push(StringPart::Interp { expr, format });
                }
                c => text.push(c),
            }
        }
        if !text.is_empty() || parts.is_empty() {
            parts.push(StringPart::Text(text));
        }
        Ok(parts)
    }

    /// Text of a string literal that may not contain interpolation.
    pub(super) fn expect_plain_string(&mut self) -> PResult<String> {
        let span = self.current_span();
        let TokenKind::Str { delim, raw } = self.current_kind() else {
            return Err(self.error_here(ErrorCode::InvalidSyntax, "a string"));
        };
        self.advance();
        let mut out = String::new();
        for part in self.parse_string(raw, *delim, span)? {
            match part {
                StringPart::Text(text) => out.push_str(&text),
                StringPart::Interp { expr, .. } => {
                    return Err(ParseError::new(
                        ErrorCode::InvalidSyntax,
                        "Interpolation is not allowed here",
                        expr.span,
                    ));
                }
            }
        }
        Ok(out)
    }

    fn parse_fragment(&mut self, text: &str, base: u32) -> PResult<Expr> {
        let tokens = lex_fragment(text, base);
        let mut sub = Parser::new(&tokens);
        sub.cursor.skip_newlines();
        let expr = sub.parse_expr()?;
        sub.cursor.skip_newlines();
        if !sub.is_at_end() {
            return Err(ParseError::new(
                ErrorCode::UnexpectedToken,
                format!("Unexpected {} in interpolation", sub.current_kind().describe()),
                sub.current_span(),
            ));
        }
        self.errors.append(&mut sub.errors);
        Ok(expr)
    }
}

fn offset(i: usize) -> u32 {
    u32::try_from(i).unwrap_or(u32::MAX)
}

/// Split `expr:fmt` at the last colon when what follows is a format spec.
fn split_format(inner: &str) -> (&str, Option<FormatSpec>) {
    if let Some(pos) = inner.rfind(':') {
        if let Some(spec) = parse_format_spec(&inner[pos + 1..]) {
            return (&inner[..pos], Some(spec));
        }
    }
    (inner, None)
}

/// `[<|>][width][.precision]`
pub(crate) fn parse_format_spec(text: &str) -> Option<FormatSpec> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let (align, rest) = match text.as_bytes()[0] {
        b'<' => (Align::Left, &text[1..]),
        b'>' => (Align::Right, &text[1..]),
        _ => (Align::Right, text),
    };
    let (width_text, precision_text) = match rest.split_once('.') {
        Some((width, precision)) => (width, Some(precision)),
        None => (rest, None),
    };
    let width = if width_text.is_empty() {
        None
    } else if width_text.bytes().all(|b| b.is_ascii_digit()) {
        Some(width_text.parse().ok()?)
    } else {
        return None;
    };
    let precision = match precision_text {
        Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            Some(digits.parse().ok()?)
        }
        Some(_) => return None,
        None => None,
    };
    Some(FormatSpec {
        align,
        width,
        precision,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_specs() {
        assert_eq!(
            parse_format_spec("<10"),
            Some(FormatSpec {
                align: Align::Left,
                width: Some(10),
                precision: None,
            })
        );
        assert_eq!(
            parse_format_spec(".2"),
            Some(FormatSpec {
                align: Align::Right,
                width: None,
                precision: Some(2),
            })
        );
        assert_eq!(parse_format_spec(" b"), None);
        assert_eq!(parse_format_spec("6.x"), None);
    }

    #[test]
    fn test_ternary_is_not_a_format() {
        let (expr, spec) = split_format("a ? b : c");
        assert_eq!(expr, "a ? b : c");
        assert_eq!(spec, None);

        let (expr, spec) = split_format("num * 100:6.2");
        assert_eq!(expr, "num * 100");
        assert_eq!(spec.and_then(|s| s.width), Some(6));
    }
}
