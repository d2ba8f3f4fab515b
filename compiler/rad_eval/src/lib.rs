//! Rad Eval - runtime for Rad scripts.
//!
//! Takes a [`rad_ir::ast::Program`] from `rad_parse` and runs it.
//!
//! # Architecture
//!
//! - [`value`]: `Value` and its shared containers (`RadList`, `RadMap`),
//!   attributed strings, and printable forms
//! - [`environment`]: lexical frames; blocks share a frame, calls get a child
//!   of the callee's closure
//! - [`binder`]: binds call arguments to declared parameters for both script
//!   functions and builtins
//! - [`typing`]: declared-type checks and `int -> float` widening
//! - [`flow`]: `return`/`break`/`continue`/`yield` signals
//! - [`defer`]: the execution-wide `defer`/`errdefer` stack
//! - [`interpreter`]: the tree walker
//! - [`builtins`]: native functions, declared by Rad signatures
//! - [`args`]: command-line binding for a script's `args:` block
//! - [`collab`]: HTTP and shell collaborators, real and mocked
//! - [`json_fields`]: column extraction for `rad`/`request` blocks
//!
//! Values are `Rc`-based and the interpreter is single-threaded.

pub mod args;
pub mod binder;
pub mod builtins;
pub mod collab;
pub mod defer;
pub mod diagnostics;
pub mod environment;
pub mod errors;
pub mod flow;
pub mod format;
pub mod interpreter;
pub mod json;
pub mod json_fields;
pub mod operators;
pub mod print_handler;
pub mod table;
pub mod typing;
pub mod value;

pub use args::{ArgError, Binding, ScriptArgs};
pub use builtins::BuiltinRegistry;
pub use environment::Environment;
pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use interpreter::{Interpreter, InterpreterBuilder, InterpreterConfig, RunOutcome};
pub use print_handler::{buffer_handler, silent_handler, stdout_handler, SharedPrintHandler};
pub use value::{RadList, RadMap, RadString, Value};
