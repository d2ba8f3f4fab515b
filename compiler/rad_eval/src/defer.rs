//! Deferred statements.
//!
//! `defer` and `errdefer` push onto one execution-wide LIFO stack, including
//! when issued inside a function body. The stack unwinds once, when the
//! script terminates, however it terminates.
//!
//! The final exit code is the first non-clean event seen during unwind. A
//! run that was already failing or exiting non-zero keeps its code; later
//! deferred failures are still run and reported. An `errdefer` runs only
//! while the outcome so far is non-zero.

use rad_ir::ast::Block;
use rad_ir::Span;
use tracing::{debug, trace};

use crate::environment::Environment;
use crate::errors::EvalError;

/// One registered `defer`/`errdefer` body.
#[derive(Clone, Debug)]
pub struct DeferUnit {
    pub body: Block,
    /// Scope the body runs in; the scope that registered it.
    pub env: Environment,
    pub on_error_only: bool,
    pub span: Span,
}

#[derive(Debug, Default)]
pub struct DeferStack {
    units: Vec<DeferUnit>,
}

impl DeferStack {
    pub fn push(&mut self, unit: DeferUnit) {
        self.units.push(unit);
    }

    pub fn pop(&mut self) -> Option<DeferUnit> {
        self.units.pop()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    Clean,
    /// `exit(n)`.
    Exit(i32),
    /// An unrecovered failure and the code it exits with.
    Failed(i32),
}

impl Termination {
    pub fn code(self) -> i32 {
        match self {
            Termination::Clean => 0,
            Termination::Exit(code) | Termination::Failed(code) => code,
        }
    }

    pub fn is_clean(self) -> bool {
        self.code() == 0
    }

    fn from_result(result: &Result<(), EvalError>) -> Self {
        match result {
            Ok(()) => Termination::Clean,
            Err(err) if err.is_exit() => Termination::Exit(err.exit_code()),
            Err(err) => Termination::Failed(err.exit_code()),
        }
    }
}

/// Final termination plus every failure to report, in the order seen.
#[derive(Debug)]
pub struct DeferOutcome {
    pub termination: Termination,
    pub errors: Vec<EvalError>,
}

/// Supplies and runs deferred units.
pub trait DeferHost {
    fn pop_defer(&mut self) -> Option<DeferUnit>;

    /// Run one unit. `exit()` inside it is reported as an exit error.
    ///
    /// # Errors
    ///
    /// Whatever the deferred body fails with.
    fn run_defer(&mut self, unit: &DeferUnit) -> Result<(), EvalError>;
}

/// Unwind every pending unit, newest first, starting from the run's own
/// result `pre`. `errdefer` units run only when `pre` itself was non-clean;
/// failures raised by other deferred units do not trigger them.
#[tracing::instrument(level = "debug", skip_all)]
pub fn unwind<H: DeferHost>(host: &mut H, pre: Result<(), EvalError>) -> DeferOutcome {
    let mut termination = Termination::from_result(&pre);
    let pre_clean = termination.is_clean();
    let mut errors = Vec::new();
    if let Err(err) = pre {
        if !err.is_exit() {
            errors.push(err);
        }
    }

    while let Some(unit) = host.pop_defer() {
        if unit.on_error_only && pre_clean {
            trace!("skipping errdefer on clean outcome");
            continue;
        }
        let result = host.run_defer(&unit);
        let event = Termination::from_result(&result);
        if termination.is_clean() && event != Termination::Clean {
            debug!(?event, "deferred unit sets the outcome");
            termination = event;
        }
        if let Err(err) = result {
            if !err.is_exit() {
                errors.push(err);
            }
        }
    }

    DeferOutcome {
        termination,
        errors,
    }
}

#[cfg(test)]
mod tests;
