//! Rad syntax tree.
//!
//! Boxed tree rather than an arena: scripts are small, and function bodies
//! are shared through `Rc<FnDef>` so closures can hold on to them.

mod args;
mod expr;
mod operators;
mod stmt;

pub use args::{ArgBlock, ArgConstraint, ArgDecl, ArgScalar, ArgType, RangeBound};
pub use expr::{
    Align, Expr, ExprKind, FnBody, FnDef, FormatSpec, ListComp, NamedArg, Param, StringPart,
};
pub use operators::{BinaryOp, UnaryOp};
pub use stmt::{
    Block, ColumnOp, DisplayBlock, FieldModifier, ForLoop, Ident, IfBranch, JsonIndex, JsonKey,
    JsonPath, JsonSegment, PathSegment, ShellStmt, SortKey, Stmt, StmtKind, Switch, SwitchBody,
    SwitchCase, TableKind, Target,
};

/// A parsed script.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Program {
    /// Text of the `---` file header, if any.
    pub description: Option<String>,
    pub args: Option<ArgBlock>,
    pub stmts: Vec<Stmt>,
}

impl Program {
    /// Top-level named function definitions, in source order.
    pub fn functions(&self) -> impl Iterator<Item = &std::rc::Rc<FnDef>> {
        self.stmts.iter().filter_map(|stmt| match &stmt.kind {
            StmtKind::FnDef(def) if def.name.is_some() => Some(def),
            _ => None,
        })
    }
}
