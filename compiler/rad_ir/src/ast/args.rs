//! The `args:` block: script argument declarations and their constraints.

use std::fmt;

use super::{Expr, Ident};
use crate::Span;

#[derive(Clone, Debug, PartialEq)]
pub struct ArgBlock {
    pub decls: Vec<ArgDecl>,
    pub constraints: Vec<ArgConstraint>,
    pub span: Span,
}

impl ArgBlock {
    pub fn decl(&self, name: &str) -> Option<&ArgDecl> {
        self.decls.iter().find(|d| d.name.name == name)
    }
}

/// `name ["external"] [s] type[?] [= default] [# comment]`, or `*name type`.
#[derive(Clone, Debug, PartialEq)]
pub struct ArgDecl {
    /// Variable name inside the script.
    pub name: Ident,
    /// Flag name on the command line, when it differs from the variable.
    pub rename: Option<String>,
    pub short: Option<char>,
    pub ty: ArgType,
    pub optional: bool,
    pub variadic: bool,
    pub default: Option<Expr>,
    pub comment: Option<String>,
    pub span: Span,
}

impl ArgDecl {
    /// Name used for `--flag` on the command line.
    pub fn flag_name(&self) -> &str {
        self.rename.as_deref().unwrap_or(&self.name.name)
    }
}

/// Scalar kind of a script argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArgScalar {
    Str,
    Int,
    Float,
    Bool,
}

impl fmt::Display for ArgScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArgScalar::Str => "str",
            ArgScalar::Int => "int",
            ArgScalar::Float => "float",
            ArgScalar::Bool => "bool",
        })
    }
}

/// Declared argument type: a scalar or a list of scalars (`str[]`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArgType {
    pub scalar: ArgScalar,
    pub list: bool,
}

impl ArgType {
    pub const fn scalar(scalar: ArgScalar) -> Self {
        ArgType {
            scalar,
            list: false,
        }
    }

    /// Bool flags take no value on the command line.
    pub fn is_flag(self) -> bool {
        self.scalar == ArgScalar::Bool && !self.list
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.list {
            write!(f, "{}[]", self.scalar)
        } else {
            write!(f, "{}", self.scalar)
        }
    }
}

/// Constraint line inside the `args:` block.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgConstraint {
    /// `name enum ["a", "b"]`
    Enum { arg: Ident, values: Vec<String> },
    /// `name regex "pattern"`
    Regex { arg: Ident, pattern: String },
    /// `name range [min, max]`; either side may be open.
    Range {
        arg: Ident,
        min: Option<RangeBound>,
        max: Option<RangeBound>,
    },
    /// `a requires b, c` / `a mutually requires b`
    Requires {
        arg: Ident,
        others: Vec<Ident>,
        mutual: bool,
    },
    /// `a excludes b` / `a mutually excludes b`
    Excludes {
        arg: Ident,
        others: Vec<Ident>,
        mutual: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeBound {
    pub value: f64,
    pub inclusive: bool,
}
