//! Token types produced by the lexer.

use std::fmt;

use rad_ir::Span;

/// Lexical error carried by [`TokenKind::Error`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LexError {
    #[default]
    UnexpectedChar,
    UnterminatedString,
    IntegerOverflow,
    InvalidNumber,
    /// A dedent that matches no enclosing indentation level.
    InconsistentIndent,
}

impl LexError {
    pub fn message(self) -> &'static str {
        match self {
            LexError::UnexpectedChar => "Unexpected character",
            LexError::UnterminatedString => "Unterminated string literal",
            LexError::IntegerOverflow => "Integer literal is too large",
            LexError::InvalidNumber => "Invalid number literal",
            LexError::InconsistentIndent => {
                "Unindent does not match any outer indentation level"
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Int(i64),
    Float(f64),
    /// Float written with an exponent, e.g. `1e6`.
    Scientific(f64),
    /// String literal; `raw` is the text between the delimiters, escapes and
    /// interpolations still unprocessed.
    Str { delim: char, raw: String },
    Ident(String),

    // Keywords
    True,
    False,
    Null,
    And,
    Or,
    Not,
    In,
    If,
    Else,
    For,
    While,
    Switch,
    Break,
    Continue,
    Return,
    Yield,
    Pass,
    Del,
    Defer,
    Errdefer,
    Fn,
    Catch,

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Semicolon,
    Dot,
    Arrow,
    Question,
    DoubleQuestion,
    Pipe,
    Dollar,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    PlusPlus,
    MinusMinus,

    // Layout
    Newline,
    Indent,
    Dedent,

    Error(LexError),
    Eof,
}

impl TokenKind {
    /// Same variant, ignoring any payload.
    pub fn same_kind(&self, other: &TokenKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Human-readable form for "expected X, found Y" messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Int(n) => format!("'{n}'"),
            TokenKind::Float(v) | TokenKind::Scientific(v) => format!("'{v}'"),
            TokenKind::Str { .. } => "string".to_owned(),
            TokenKind::Ident(name) => format!("'{name}'"),
            TokenKind::Newline => "newline".to_owned(),
            TokenKind::Indent => "indentation".to_owned(),
            TokenKind::Dedent => "end of block".to_owned(),
            TokenKind::Error(err) => err.message().to_owned(),
            TokenKind::Eof => "end of file".to_owned(),
            other => format!("'{}'", other.symbol()),
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Not => "not",
            TokenKind::In => "in",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::For => "for",
            TokenKind::While => "while",
            TokenKind::Switch => "switch",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Return => "return",
            TokenKind::Yield => "yield",
            TokenKind::Pass => "pass",
            TokenKind::Del => "del",
            TokenKind::Defer => "defer",
            TokenKind::Errdefer => "errdefer",
            TokenKind::Fn => "fn",
            TokenKind::Catch => "catch",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Dot => ".",
            TokenKind::Arrow => "->",
            TokenKind::Question => "?",
            TokenKind::DoubleQuestion => "??",
            TokenKind::Pipe => "|",
            TokenKind::Dollar => "$",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Assign => "=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::PercentEq => "%=",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            _ => "?",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// `# text` comment. Kept out of the token stream; the `args:` block reads
/// trailing ones as flag descriptions.
#[derive(Clone, Debug, PartialEq)]
pub struct Comment {
    pub text: String,
    pub span: Span,
}

/// Lexer output.
#[derive(Clone, Debug, Default)]
pub struct TokenList {
    pub tokens: Vec<Token>,
    pub comments: Vec<Comment>,
}
