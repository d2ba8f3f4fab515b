//! Lexer and parser for Rad scripts.
//!
//! [`parse`] turns source text into a [`Program`]. Parsing never stops at the
//! first problem: every [`ParseError`] found is returned alongside whatever
//! part of the program could be built, and the caller decides whether to run.

mod cursor;
mod error;
mod grammar;
mod header;
pub mod lexer;
pub mod token;

pub use cursor::Cursor;
pub use error::ParseError;

use rad_ir::ast::Program;
use tracing::debug;

/// Result of parsing a script.
#[derive(Debug)]
pub struct ParseOutput {
    pub program: Program,
    pub errors: Vec<ParseError>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parse a whole script, including its `---` header and `args:` block.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse(source: &str) -> ParseOutput {
    let header = header::split_header(source);
    let tokens = lexer::lex(&header.source);
    let parser = grammar::Parser::new(&tokens);
    let (program, errors) = parser.parse_program(header.description);
    debug!(
        stmts = program.stmts.len(),
        errors = errors.len(),
        "parsed script"
    );
    ParseOutput { program, errors }
}
