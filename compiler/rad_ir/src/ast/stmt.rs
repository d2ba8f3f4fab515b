//! Statement nodes.

use std::fmt;
use std::rc::Rc;

use super::{BinaryOp, Expr, FnDef};
use crate::{Span, Spanned};

/// Statement node.
#[derive(Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

impl fmt::Debug for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        self.span
    }
}

/// Statement kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// `a = v`, `a, b = v`, `a[0].x = v`, optionally with a `catch:` block.
    Assign {
        targets: Vec<Target>,
        value: Expr,
        catch: Option<Block>,
    },
    /// `a += v`
    CompoundAssign {
        target: Target,
        op: BinaryOp,
        value: Expr,
    },
    /// `a++` / `a--`
    IncrDecr { target: Target, increment: bool },
    /// Bare expression, optionally with a `catch:` block.
    Expr { expr: Expr, catch: Option<Block> },
    If {
        branches: Vec<IfBranch>,
        otherwise: Option<Block>,
    },
    For(ForLoop),
    /// `while cond:`; no condition loops until `break`.
    While { cond: Option<Expr>, body: Block },
    Switch(Switch),
    Break,
    Continue,
    Pass,
    Return(Vec<Expr>),
    Yield(Vec<Expr>),
    /// `del a, m["k"]`
    Del(Vec<Target>),
    /// `defer` / `errdefer`
    Defer { on_error_only: bool, body: Block },
    FnDef(Rc<FnDef>),
    Shell(ShellStmt),
    Display(DisplayBlock),
    /// `Name = json.items[].name`: declares a field a `rad`/`request` block
    /// can extract.
    JsonField { name: Ident, path: JsonPath },
}

/// Indented statement sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>, span: Span) -> Self {
        Block { stmts, span }
    }
}

/// Identifier with its position.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Ident {
            name: name.into(),
            span,
        }
    }
}

/// Left-hand side of an assignment: `root.seg[seg]...`
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    pub root: Ident,
    pub segments: Vec<PathSegment>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PathSegment {
    Index(Expr),
    Field(Ident),
}

/// One `if` / `else if` arm: `if pre; cond:`.
#[derive(Clone, Debug, PartialEq)]
pub struct IfBranch {
    pub pre: Option<Box<Stmt>>,
    pub cond: Expr,
    pub body: Block,
}

/// `for a, b in iter with ctx:`
#[derive(Clone, Debug, PartialEq)]
pub struct ForLoop {
    pub vars: Vec<Ident>,
    pub iter: Expr,
    pub context: Option<Ident>,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Switch {
    pub discriminant: Expr,
    pub cases: Vec<SwitchCase>,
    pub default: Option<SwitchBody>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SwitchCase {
    pub keys: Vec<Expr>,
    pub body: SwitchBody,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SwitchBody {
    /// `case k -> v1, v2`
    Values(Vec<Expr>),
    /// `case k:` followed by a block.
    Block(Block),
}

/// `code, out = quiet $cmd catch:`
#[derive(Clone, Debug, PartialEq)]
pub struct ShellStmt {
    /// Exit code, stdout, stderr, in that order.
    pub targets: Vec<Ident>,
    pub cmd: Expr,
    pub quiet: bool,
    pub confirm: bool,
    pub catch: Option<Block>,
}

/// Which keyword opened a table block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableKind {
    Display,
    /// Fetch JSON from the source URL, extract the fields, print a table.
    Rad,
    /// Like `Rad` without printing.
    Request,
}

impl TableKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            TableKind::Display => "display",
            TableKind::Rad => "rad",
            TableKind::Request => "request",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "display" => Some(TableKind::Display),
            "rad" => Some(TableKind::Rad),
            "request" => Some(TableKind::Request),
            _ => None,
        }
    }
}

/// `display [source]:`, `rad <url>:` or `request <url>:` table block.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayBlock {
    pub kind: TableKind,
    /// For `display`, a list of maps to pull columns from. For `rad` and
    /// `request`, the URL to fetch. Without it each field names a list
    /// variable.
    pub source: Option<Expr>,
    pub fields: Vec<Ident>,
    pub modifiers: Vec<FieldModifier>,
    pub sorts: Vec<SortKey>,
    pub span: Span,
}

/// Per-column pipeline: `name:` followed by `map`/`filter`/`color` lines.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldModifier {
    pub fields: Vec<Ident>,
    pub ops: Vec<ColumnOp>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ColumnOp {
    Map(Expr),
    Filter(Expr),
    /// `color "red" "regex"`
    Color { color: Expr, pattern: Expr },
}

/// `sort a desc`; a bare `sort` has no field and sorts by every column.
#[derive(Clone, Debug, PartialEq)]
pub struct SortKey {
    pub field: Option<Ident>,
    pub descending: bool,
}

/// Path into a JSON document. The first segment is the `json` root.
#[derive(Clone, Debug, PartialEq)]
pub struct JsonPath {
    pub segments: Vec<JsonSegment>,
    pub span: Span,
}

/// One dotted step, `key[][0]`.
#[derive(Clone, Debug, PartialEq)]
pub struct JsonSegment {
    pub key: JsonKey,
    pub indexes: Vec<JsonIndex>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JsonKey {
    /// The leading `json`.
    Root,
    Name(String),
    /// `*`: every key of an object, in sorted order.
    AnyKey,
}

#[derive(Clone, Debug, PartialEq)]
pub enum JsonIndex {
    /// `[]`: every element of an array.
    Each,
    /// `[expr]`, evaluated when the field is declared.
    At(Expr),
}
