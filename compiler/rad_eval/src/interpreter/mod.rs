//! Tree-walking interpreter for Rad.
//!
//! # Architecture
//!
//! Statements evaluate to a [`Flow`] and expressions to a [`Value`]; failures
//! travel separately as `Err(EvalError)`. Every evaluation method takes the
//! [`Environment`] to run in explicitly, so block constructs share their
//! caller's frame and only function calls switch to a child of the callee's
//! closure.
//!
//! - `expr` - literals, names, operators, indexing, `??` and `catch`
//! - `stmt` - statement dispatch, `if`/`for`/`while`, `del`, `defer`
//! - `assign` - assignment targets and in-place mutation
//! - `function_call` - calls to script functions and builtins, UFCS
//! - `switch` - case selection shared by switch statements and expressions
//! - `display` - table blocks: filter, sort, map, color, print
//! - `request` - JSON field declarations and fetching for `rad`/`request`
//! - `shell` - `$cmd` statements
//!
//! A run ends by unwinding the defer stack once; see [`crate::defer`].

mod assign;
mod builder;
mod display;
mod expr;
mod function_call;
mod request;
mod shell;
mod stmt;
mod switch;

pub use builder::InterpreterBuilder;

use rad_ir::ast::Program;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::args::ScriptArgs;
use crate::builtins::BuiltinRegistry;
use crate::collab::{HttpClient, ShellExecutor};
use crate::defer::{self, DeferHost, DeferStack, DeferUnit};
use crate::diagnostics::CallStack;
use crate::environment::Environment;
use crate::errors::{
    break_outside_loop, continue_outside_loop, function_shadows_argument,
    return_outside_function, yield_outside_switch, EvalError, EvalResult,
};
use crate::flow::Flow;
use crate::json_fields::FieldPath;
use crate::print_handler::SharedPrintHandler;

/// Settings for one run.
#[derive(Clone, Debug)]
pub struct InterpreterConfig {
    /// Nested user-function calls allowed before a run fails.
    pub max_call_depth: usize,
    /// Emit ANSI attributes when printing.
    pub color: bool,
    /// Ask before every shell command, not only `confirm $cmd`.
    pub confirm_shell: bool,
    pub script_name: String,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_call_depth: 1000,
            color: false,
            confirm_shell: false,
            script_name: "<script>".to_string(),
        }
    }
}

/// How a run ended: the process exit code and every failure to report, in
/// the order they happened.
#[derive(Debug)]
pub struct RunOutcome {
    pub exit_code: i32,
    pub errors: Vec<EvalError>,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.exit_code == 0 && self.errors.is_empty()
    }
}

/// Evaluates one program. Build with [`InterpreterBuilder`].
pub struct Interpreter<'r> {
    builtins: &'r BuiltinRegistry,
    pub(crate) config: InterpreterConfig,
    globals: Environment,
    pub(crate) print: SharedPrintHandler,
    pub(crate) http: Box<dyn HttpClient>,
    shell: Box<dyn ShellExecutor>,
    defers: DeferStack,
    call_stack: CallStack,
    /// Declared `Name = json...` paths by field name.
    json_fields: FxHashMap<String, FieldPath>,
}

impl Interpreter<'_> {
    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    /// Run `program` with its bound script arguments, then unwind every
    /// pending `defer`.
    #[tracing::instrument(level = "debug", skip_all, fields(script = %self.config.script_name))]
    pub fn run(&mut self, program: &Program, args: &ScriptArgs) -> RunOutcome {
        let globals = self.globals.clone();
        let result = self.run_program(program, args, &globals);
        let outcome = defer::unwind(self, result);
        let exit_code = outcome.termination.code();
        debug!(exit_code, errors = outcome.errors.len(), "run finished");
        RunOutcome {
            exit_code,
            errors: outcome.errors,
        }
    }

    fn run_program(
        &mut self,
        program: &Program,
        args: &ScriptArgs,
        globals: &Environment,
    ) -> EvalResult<()> {
        for (name, value) in args.iter() {
            globals.define(name, value.clone());
        }
        for def in program.functions() {
            let Some(name) = &def.name else { continue };
            if args.contains(&name.name) {
                return Err(function_shadows_argument(&name.name).with_span(name.span));
            }
            globals.define(&name.name, Self::make_fn(def, globals));
        }
        debug!(statements = program.stmts.len(), "executing");
        for stmt in &program.stmts {
            let flow = self.exec_stmt(stmt, globals)?;
            escaped_flow(flow).map_err(|e| e.or_span(stmt.span))?;
        }
        Ok(())
    }
}

/// Signals that reach a function or script boundary become errors there.
fn escaped_flow(flow: Flow) -> EvalResult<()> {
    match flow {
        Flow::Normal => Ok(()),
        Flow::Break => Err(break_outside_loop()),
        Flow::Continue => Err(continue_outside_loop()),
        Flow::Return(_) => Err(return_outside_function()),
        Flow::Yield(_) => Err(yield_outside_switch()),
    }
}

impl DeferHost for Interpreter<'_> {
    fn pop_defer(&mut self) -> Option<DeferUnit> {
        self.defers.pop()
    }

    fn run_defer(&mut self, unit: &DeferUnit) -> Result<(), EvalError> {
        let flow = self.exec_block(&unit.body, &unit.env)?;
        escaped_flow(flow).map_err(|e| e.or_span(unit.span))
    }
}
