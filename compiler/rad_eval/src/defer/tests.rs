use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::errors::{exit, other, undefined_variable};
use rad_diagnostic::ErrorCode;

/// Each unit is identified by its span start; `results` says what running
/// it produces.
struct ScriptedHost {
    stack: DeferStack,
    results: Vec<Result<(), EvalError>>,
    ran: Vec<u32>,
}

impl ScriptedHost {
    fn new(units: Vec<(bool, Result<(), EvalError>)>) -> Self {
        let mut stack = DeferStack::default();
        let mut results = Vec::new();
        for (i, (on_error_only, result)) in (0u32..).zip(units) {
            stack.push(DeferUnit {
                body: Block::new(Vec::new(), Span::DUMMY),
                env: Environment::new(),
                on_error_only,
                span: Span::point(i),
            });
            results.push(result);
        }
        ScriptedHost {
            stack,
            results,
            ran: Vec::new(),
        }
    }
}

impl DeferHost for ScriptedHost {
    fn pop_defer(&mut self) -> Option<DeferUnit> {
        self.stack.pop()
    }

    fn run_defer(&mut self, unit: &DeferUnit) -> Result<(), EvalError> {
        self.ran.push(unit.span.start);
        self.results[unit.span.start as usize].clone()
    }
}

fn failure(msg: &str) -> EvalError {
    other(ErrorCode::GenericRuntime, msg)
}

#[test]
fn test_runs_lifo() {
    let mut host = ScriptedHost::new(vec![(false, Ok(())), (false, Ok(())), (false, Ok(()))]);
    let outcome = unwind(&mut host, Ok(()));
    assert_eq!(host.ran, vec![2, 1, 0]);
    assert_eq!(outcome.termination, Termination::Clean);
    assert!(outcome.errors.is_empty());
}

#[test]
fn test_every_unit_runs_after_a_failure() {
    let mut host = ScriptedHost::new(vec![
        (false, Ok(())),
        (false, Err(failure("second"))),
        (false, Err(exit(3))),
    ]);
    let outcome = unwind(&mut host, Ok(()));
    assert_eq!(host.ran, vec![2, 1, 0]);
    // exit(3) is reached first during unwind.
    assert_eq!(outcome.termination, Termination::Exit(3));
    assert_eq!(outcome.errors.len(), 1);
}

#[test]
fn test_deferred_exit_zero_does_not_preempt_failure() {
    let mut host = ScriptedHost::new(vec![(false, Err(failure("boom"))), (false, Err(exit(0)))]);
    let outcome = unwind(&mut host, Ok(()));
    assert_eq!(outcome.termination, Termination::Failed(1));
    assert_eq!(outcome.errors[0].message, "boom");
}

#[test]
fn test_deferred_exit_zero_adopted_when_clean() {
    let mut host = ScriptedHost::new(vec![(false, Err(exit(0)))]);
    let outcome = unwind(&mut host, Ok(()));
    assert_eq!(outcome.termination, Termination::Exit(0));
    assert_eq!(outcome.termination.code(), 0);
}

#[test]
fn test_pre_unwind_failure_keeps_its_code() {
    let mut host = ScriptedHost::new(vec![(false, Err(exit(7)))]);
    let outcome = unwind(&mut host, Err(undefined_variable("x")));
    assert_eq!(outcome.termination, Termination::Failed(1));
    assert_eq!(host.ran, vec![0]);
    assert_eq!(outcome.errors.len(), 1);
}

#[test]
fn test_pre_unwind_exit_keeps_its_code() {
    let mut host = ScriptedHost::new(vec![(false, Err(failure("late")))]);
    let outcome = unwind(&mut host, Err(exit(4)));
    assert_eq!(outcome.termination, Termination::Exit(4));
    assert_eq!(outcome.errors.len(), 1);
}

#[test]
fn test_errdefer_skipped_on_clean_run() {
    let mut host = ScriptedHost::new(vec![(true, Ok(())), (false, Ok(()))]);
    unwind(&mut host, Ok(()));
    assert_eq!(host.ran, vec![1]);
}

#[test]
fn test_errdefer_runs_on_failure() {
    let mut host = ScriptedHost::new(vec![(true, Ok(())), (false, Ok(()))]);
    unwind(&mut host, Err(exit(2)));
    assert_eq!(host.ran, vec![1, 0]);
}

#[test]
fn test_errdefer_ignores_failures_raised_during_unwind() {
    let mut host = ScriptedHost::new(vec![(true, Ok(())), (false, Err(failure("x")))]);
    let outcome = unwind(&mut host, Ok(()));
    assert_eq!(host.ran, vec![1]);
    assert_eq!(outcome.termination, Termination::Failed(1));
    assert_eq!(outcome.errors.len(), 1);
}

#[test]
fn test_errdefer_ignores_deferred_exit() {
    let mut host = ScriptedHost::new(vec![(true, Ok(())), (false, Err(exit(5)))]);
    let outcome = unwind(&mut host, Ok(()));
    assert_eq!(host.ran, vec![1]);
    assert_eq!(outcome.termination, Termination::Exit(5));
}

proptest! {
    #[test]
    fn test_final_code_is_first_non_clean_event(codes in prop::collection::vec(0i32..4, 0..8)) {
        let units = codes.iter().map(|&c| (false, if c == 0 { Ok(()) } else { Err(exit(c)) })).collect();
        let mut host = ScriptedHost::new(units);
        let outcome = unwind(&mut host, Ok(()));
        let expected = codes.iter().rev().copied().find(|&c| c != 0).unwrap_or(0);
        prop_assert_eq!(outcome.termination.code(), expected);
        prop_assert_eq!(host.ran.len(), codes.len());
    }
}
