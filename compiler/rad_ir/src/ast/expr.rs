//! Expression nodes.

use std::fmt;
use std::rc::Rc;

use super::{Block, BinaryOp, Ident, Switch, UnaryOp};
use crate::{Span, Spanned, Type};

/// Expression node.
#[derive(Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    /// Whether this is a scientific-notation literal such as `1e6`.
    pub fn is_scientific_literal(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Float {
                scientific: true,
                ..
            }
        )
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        self.span
    }
}

/// Expression kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Null,
    Bool(bool),
    Int(i64),
    /// `scientific` is set for literals written with an exponent (`1e6`).
    Float { value: f64, scientific: bool },
    /// String literal, possibly interpolated.
    Str(Vec<StringPart>),
    List(Vec<Expr>),
    Map(Vec<(Expr, Expr)>),
    /// `[expr for a, b in src with ctx if cond]`
    ListComp(Box<ListComp>),
    Ident(String),

    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// `cond ? then : otherwise`
    Ternary {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// `left ?? right`
    Fallback {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `catch expr`
    Catch(Box<Expr>),

    /// `base[index]`
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    /// `base[start:end]`, either bound optional.
    Slice {
        base: Box<Expr>,
        start: Option<Box<Expr>>,
        end: Option<Box<Expr>>,
    },
    /// `base.name` without a call.
    Field { base: Box<Expr>, name: Ident },
    /// `callee(args, name=value)`
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        named: Vec<NamedArg>,
    },
    /// `receiver.method(args)`: a map field holding a function, else UFCS.
    MethodCall {
        receiver: Box<Expr>,
        method: Ident,
        args: Vec<Expr>,
        named: Vec<NamedArg>,
    },

    Lambda(Rc<FnDef>),
    /// `switch` in value position.
    Switch(Box<Switch>),
}

/// `name=value` in a call.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedArg {
    pub name: Ident,
    pub value: Expr,
}

/// Piece of a string literal.
#[derive(Clone, Debug, PartialEq)]
pub enum StringPart {
    Text(String),
    Interp {
        expr: Expr,
        format: Option<FormatSpec>,
    },
}

/// `{expr:<10.2}` formatting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FormatSpec {
    pub align: Align,
    pub width: Option<usize>,
    pub precision: Option<usize>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    Left,
    #[default]
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListComp {
    pub expr: Expr,
    pub vars: Vec<Ident>,
    pub iter: Expr,
    pub context: Option<Ident>,
    pub cond: Option<Expr>,
}

/// A function definition or lambda.
///
/// Shared with every function value created from it, so closures never copy
/// the body.
#[derive(Clone, Debug, PartialEq)]
pub struct FnDef {
    /// `None` for lambdas.
    pub name: Option<Ident>,
    pub params: Vec<Param>,
    pub return_type: Option<Type>,
    pub body: FnBody,
    pub span: Span,
}

impl FnDef {
    pub fn display_name(&self) -> &str {
        self.name.as_ref().map_or("<lambda>", |n| n.name.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FnBody {
    Block(Block),
    /// `fn(x) x * 2`: the expression's value is returned.
    Expr(Expr),
}

/// Declared parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: Ident,
    /// `None` means `any`.
    pub ty: Option<Type>,
    pub default: Option<Expr>,
    /// `*name`: collects remaining positionals.
    pub variadic: bool,
    /// Declared after `*` or a variadic.
    pub named_only: bool,
    /// `name?` or an optional type: binds `null` when not given.
    pub optional: bool,
    pub span: Span,
}

impl Param {
    /// `_`-prefixed parameters can only be passed positionally.
    pub fn positional_only(&self) -> bool {
        self.name.name.starts_with('_')
    }
}
