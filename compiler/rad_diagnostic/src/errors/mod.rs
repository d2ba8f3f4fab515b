//! Embedded error documentation for `rad --explain`.
//!
//! Each documented code has a markdown file in this directory, embedded at
//! compile time. To document a new code, add `RADxxxxx.md` here and an entry
//! to `DOCS`.

use crate::ErrorCode;

/// Registry of embedded error documentation.
pub struct ErrorDocs;

impl ErrorDocs {
    /// Markdown documentation for `code`, if any.
    pub fn get(code: ErrorCode) -> Option<&'static str> {
        DOCS.iter().find(|(c, _)| *c == code).map(|(_, doc)| *doc)
    }

    /// All documented error codes.
    pub fn all_codes() -> impl Iterator<Item = ErrorCode> {
        DOCS.iter().map(|(code, _)| *code)
    }

    pub fn has_docs(code: ErrorCode) -> bool {
        DOCS.iter().any(|(c, _)| *c == code)
    }
}

static DOCS: &[(ErrorCode, &str)] = &[
    // Syntax
    (ErrorCode::InvalidSyntax, include_str!("RAD10001.md")),
    (ErrorCode::MissingColon, include_str!("RAD10002.md")),
    (ErrorCode::UnexpectedToken, include_str!("RAD10009.md")),
    // Runtime
    (ErrorCode::GenericRuntime, include_str!("RAD20000.md")),
    (ErrorCode::UndefinedVariable, include_str!("RAD20028.md")),
    (ErrorCode::IndexOutOfBounds, include_str!("RAD20029.md")),
    (ErrorCode::BreakOutsideLoop, include_str!("RAD20030.md")),
    (ErrorCode::UnpackMismatch, include_str!("RAD20033.md")),
    (ErrorCode::SwitchNoMatch, include_str!("RAD20034.md")),
    (ErrorCode::SwitchMultipleMatch, include_str!("RAD20035.md")),
    (ErrorCode::DivisionByZero, include_str!("RAD20036.md")),
    // Type
    (ErrorCode::TypeMismatch, include_str!("RAD30001.md")),
    // Validation
    (
        ErrorCode::ScientificNotationNotWholeNumber,
        include_str!("RAD40001.md"),
    ),
    (
        ErrorCode::HoistedFunctionShadowsArgument,
        include_str!("RAD40002.md"),
    ),
    (ErrorCode::UnknownFunction, include_str!("RAD40003.md")),
];
