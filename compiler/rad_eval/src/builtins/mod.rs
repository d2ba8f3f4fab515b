//! Native functions.
//!
//! Every builtin is declared by a Rad signature such as
//! `len(_val: list|str|map) -> int`. The registry parses each signature once
//! at startup, so calls to builtins go through the same binder as script
//! functions: arity, named arguments, defaults and type checks all behave
//! identically. Implementations receive already-checked arguments.

mod collections;
mod colors;
mod convert;
mod encoding;
mod http;
mod numbers;
mod output;
mod strings;
mod system;

use std::fmt;
use std::rc::Rc;

use rad_diagnostic::ErrorCode;
use rad_ir::ast::{Param, StmtKind};
use rad_ir::{Span, Type};
use rustc_hash::FxHashMap;
use tracing::{debug, error};

use crate::binder::BoundArgs;
use crate::environment::Environment;
use crate::errors::{other, EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::{RadList, RadMap, RadString, Value};

/// Call-site information handed to every builtin.
#[derive(Clone, Debug)]
pub struct CallCtx {
    pub span: Span,
    /// Scope the call was made from.
    pub env: Environment,
}

/// Native implementation. `None` means the call produced no value.
pub type BuiltinFn =
    fn(&mut Interpreter<'_>, &CallCtx, &BoundArgs) -> EvalResult<Option<Value>>;

type Entry = (&'static str, BuiltinFn);

/// A native function together with its parsed signature.
pub struct Builtin {
    name: String,
    pub params: Vec<Param>,
    pub return_type: Option<Type>,
    pub func: BuiltinFn,
}

impl Builtin {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin")
            .field("name", &self.name)
            .field("params", &self.params.len())
            .finish_non_exhaustive()
    }
}

/// A builtin signature that does not parse as a function header.
#[derive(Debug, thiserror::Error)]
#[error("Invalid builtin signature {signature:?}: {reason}")]
pub struct SignatureError {
    pub signature: String,
    pub reason: String,
}

/// Name to builtin lookup, built once and shared by reference.
#[derive(Debug, Default)]
pub struct BuiltinRegistry {
    builtins: FxHashMap<String, Rc<Builtin>>,
}

impl BuiltinRegistry {
    /// Registry with every standard builtin.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for (signature, func) in standard_entries() {
            if let Err(err) = registry.register(signature, func) {
                error!(%err, "skipping builtin");
            }
        }
        debug!(count = registry.len(), "registered builtins");
        registry
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse `signature` and register `func` under its name, replacing any
    /// builtin of the same name.
    ///
    /// # Errors
    ///
    /// The signature is not a valid `name(params) [-> type]` header.
    pub fn register(&mut self, signature: &str, func: BuiltinFn) -> Result<(), SignatureError> {
        let invalid = |reason: String| SignatureError {
            signature: signature.to_string(),
            reason,
        };
        let output = rad_parse::parse(&format!("fn {signature}:\n    pass\n"));
        if let Some(first) = output.errors.first() {
            return Err(invalid(first.message.clone()));
        }
        let Some(StmtKind::FnDef(def)) = output.program.stmts.first().map(|s| &s.kind) else {
            return Err(invalid("not a function header".to_string()));
        };
        let Some(name) = &def.name else {
            return Err(invalid("missing name".to_string()));
        };
        let builtin = Builtin {
            name: name.name.clone(),
            params: def.params.clone(),
            return_type: def.return_type.clone(),
            func,
        };
        self.builtins.insert(name.name.clone(), Rc::new(builtin));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Rc<Builtin>> {
        self.builtins.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.builtins.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.builtins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builtins.is_empty()
    }

    /// Sorted builtin names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builtins.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn standard_entries() -> impl Iterator<Item = Entry> {
    [
        output::ENTRIES,
        convert::ENTRIES,
        system::ENTRIES,
        collections::ENTRIES,
        strings::ENTRIES,
        numbers::ENTRIES,
        colors::ENTRIES,
        encoding::ENTRIES,
        http::ENTRIES,
    ]
    .into_iter()
    .flatten()
    .copied()
}

// Argument extraction. The binder has already checked declared types, so a
// mismatch here means a signature and its implementation disagree.

#[cold]
fn bad_arg(name: &str, value: &Value) -> EvalError {
    other(
        ErrorCode::InternalBug,
        format!(
            "Builtin received {} for argument '{name}'",
            value.type_name()
        ),
    )
}

fn str_arg(args: &BoundArgs, name: &str) -> EvalResult<RadString> {
    let value = args.get(name);
    value.as_rad_str().cloned().ok_or_else(|| bad_arg(name, &value))
}

fn int_arg(args: &BoundArgs, name: &str) -> EvalResult<i64> {
    let value = args.get(name);
    value.as_int().ok_or_else(|| bad_arg(name, &value))
}

fn num_arg(args: &BoundArgs, name: &str) -> EvalResult<f64> {
    let value = args.get(name);
    value.as_float().ok_or_else(|| bad_arg(name, &value))
}

fn bool_arg(args: &BoundArgs, name: &str) -> EvalResult<bool> {
    match args.get(name) {
        Value::Bool(b) => Ok(b),
        value => Err(bad_arg(name, &value)),
    }
}

fn list_arg(args: &BoundArgs, name: &str) -> EvalResult<RadList> {
    let value = args.get(name);
    value.as_list().cloned().ok_or_else(|| bad_arg(name, &value))
}

fn map_arg(args: &BoundArgs, name: &str) -> EvalResult<RadMap> {
    let value = args.get(name);
    value.as_map().cloned().ok_or_else(|| bad_arg(name, &value))
}

#[inline]
fn some(value: impl Into<Value>) -> EvalResult<Option<Value>> {
    Ok(Some(value.into()))
}

#[cfg(test)]
mod tests;
