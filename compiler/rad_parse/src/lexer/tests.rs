use super::*;
use pretty_assertions::assert_eq;

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).tokens.into_iter().map(|t| t.kind).collect()
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Ident(name.to_owned())
}

#[test]
fn test_simple_assignment() {
    assert_eq!(
        kinds("a = 1_000"),
        vec![
            ident("a"),
            TokenKind::Assign,
            TokenKind::Int(1000),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_numbers() {
    assert_eq!(
        kinds("1.5 2e3 1.5e-2")[..3],
        [
            TokenKind::Float(1.5),
            TokenKind::Scientific(2000.0),
            TokenKind::Scientific(0.015),
        ]
    );
}

#[test]
fn test_integer_overflow_is_an_error_token() {
    assert_eq!(
        kinds("99999999999999999999")[0],
        TokenKind::Error(LexError::IntegerOverflow)
    );
}

#[test]
fn test_keywords_and_operators() {
    assert_eq!(
        kinds("x ?? y not in z")[..6],
        [
            ident("x"),
            TokenKind::DoubleQuestion,
            ident("y"),
            TokenKind::Not,
            TokenKind::In,
            ident("z"),
        ]
    );
}

#[test]
fn test_string_with_nested_interpolation() {
    let tokens = lex(r#"print("len: {len("bob")}")"#).tokens;
    assert_eq!(
        tokens[2].kind,
        TokenKind::Str {
            delim: '"',
            raw: r#"len: {len("bob")}"#.to_owned(),
        }
    );
    assert_eq!(tokens[3].kind, TokenKind::RParen);
}

#[test]
fn test_escaped_delimiter_does_not_close() {
    let tokens = lex(r"'it\'s'").tokens;
    assert_eq!(
        tokens[0].kind,
        TokenKind::Str {
            delim: '\'',
            raw: r"it\'s".to_owned(),
        }
    );
}

#[test]
fn test_unterminated_string() {
    assert_eq!(
        kinds("a = \"oops\nb = 1")[2],
        TokenKind::Error(LexError::UnterminatedString)
    );
}

#[test]
fn test_comments_are_collected() {
    let list = lex("a = 1 # the answer\n// ignored\nb = 2");
    assert_eq!(list.comments.len(), 1);
    assert_eq!(list.comments[0].text, "the answer");
    assert!(!list.tokens.iter().any(|t| t.kind == TokenKind::Error(LexError::UnexpectedChar)));
}

#[test]
fn test_indent_and_dedent() {
    let source = "if x:\n    a\n\n    b\nc";
    assert_eq!(
        kinds(source),
        vec![
            TokenKind::If,
            ident("x"),
            TokenKind::Colon,
            TokenKind::Newline,
            TokenKind::Indent,
            ident("a"),
            TokenKind::Newline,
            ident("b"),
            TokenKind::Newline,
            TokenKind::Dedent,
            ident("c"),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_newlines_inside_brackets_are_ignored() {
    let source = "a = [\n    1,\n    2,\n]\nb";
    let kinds = kinds(source);
    assert!(!kinds.contains(&TokenKind::Indent));
    assert_eq!(
        kinds.iter().filter(|k| **k == TokenKind::Newline).count(),
        2
    );
}

#[test]
fn test_unclosed_blocks_dedent_at_eof() {
    let kinds = kinds("for x in y:\n\tif x:\n\t\tprint(x)");
    assert_eq!(
        kinds[kinds.len() - 3..],
        [TokenKind::Dedent, TokenKind::Dedent, TokenKind::Eof]
    );
}

#[test]
fn test_inconsistent_dedent() {
    let kinds = kinds("if x:\n        a\n    b");
    assert!(kinds.contains(&TokenKind::Error(LexError::InconsistentIndent)));
}

#[test]
fn test_fragment_spans_are_shifted() {
    let list = lex_fragment(" x + 1", 10);
    assert_eq!(list.tokens[0].kind, ident("x"));
    assert_eq!(list.tokens[0].span, Span::new(11, 12));
    assert!(!list.tokens.iter().any(|t| t.kind == TokenKind::Indent));
}

#[test]
fn test_interpolation_end_skips_nested_strings() {
    assert_eq!(interpolation_end(r#"a["}"]} rest"#), Some(6));
    assert_eq!(interpolation_end("x"), None);
}
