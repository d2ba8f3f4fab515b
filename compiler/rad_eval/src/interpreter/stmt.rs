//! Statement execution.

use rad_ir::ast::{Block, BinaryOp, Expr, ExprKind, ForLoop, Ident, IfBranch, Stmt, StmtKind, Target};
use tracing::trace;

use super::switch::SwitchOutcome;
use super::Interpreter;
use crate::defer::DeferUnit;
use crate::environment::Environment;
use crate::errors::{
    invalid_operands, not_iterable, output_count_mismatch, unpack_mismatch, EvalErrorKind,
    EvalResult,
};
use crate::flow::{Flow, LoopAction};
use crate::operators::evaluate_binary;
use crate::value::{RadMap, Value};

impl Interpreter<'_> {
    pub(crate) fn exec_block(&mut self, block: &Block, env: &Environment) -> EvalResult<Flow> {
        for stmt in &block.stmts {
            let flow = self.exec_stmt(stmt, env)?;
            if !flow.is_normal() {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    pub(super) fn exec_stmt(&mut self, stmt: &Stmt, env: &Environment) -> EvalResult<Flow> {
        trace!(span = %stmt.span, "stmt");
        self.exec_stmt_inner(stmt, env)
            .map_err(|e| e.or_span(stmt.span))
    }

    fn exec_stmt_inner(&mut self, stmt: &Stmt, env: &Environment) -> EvalResult<Flow> {
        match &stmt.kind {
            StmtKind::Assign {
                targets,
                value,
                catch,
            } => self.exec_assign(targets, value, catch.as_ref(), env),
            StmtKind::CompoundAssign { target, op, value } => {
                self.exec_compound(target, *op, value, env)?;
                Ok(Flow::Normal)
            }
            StmtKind::IncrDecr { target, increment } => {
                let op = if *increment { BinaryOp::Add } else { BinaryOp::Sub };
                let current = self.read_target(target, env)?;
                let next = evaluate_binary(current, Value::Int(1), op)?;
                self.assign(target, next, env)?;
                Ok(Flow::Normal)
            }
            StmtKind::Expr { expr, catch } => match catch {
                None => {
                    self.eval_maybe_void(expr, env)?;
                    Ok(Flow::Normal)
                }
                Some(block) => match self.eval_maybe_void(expr, env) {
                    Ok(_) => Ok(Flow::Normal),
                    Err(err) if !err.is_exit() => self.exec_block(block, env),
                    Err(err) => Err(err),
                },
            },
            StmtKind::If {
                branches,
                otherwise,
            } => self.exec_if(branches, otherwise.as_ref(), env),
            StmtKind::For(for_loop) => self.exec_for(for_loop, env),
            StmtKind::While { cond, body } => self.exec_while(cond.as_ref(), body, env),
            StmtKind::Switch(switch) => self.exec_switch_stmt(switch, env),
            StmtKind::Break => Ok(Flow::Break),
            StmtKind::Continue => Ok(Flow::Continue),
            StmtKind::Pass => Ok(Flow::Normal),
            StmtKind::Return(exprs) => self.eval_values(exprs, env).map(Flow::Return),
            StmtKind::Yield(exprs) => self.eval_values(exprs, env).map(Flow::Yield),
            StmtKind::Del(targets) => {
                for target in targets {
                    self.delete(target, env)?;
                }
                Ok(Flow::Normal)
            }
            StmtKind::Defer {
                on_error_only,
                body,
            } => {
                self.defers.push(DeferUnit {
                    body: body.clone(),
                    env: env.clone(),
                    on_error_only: *on_error_only,
                    span: stmt.span,
                });
                Ok(Flow::Normal)
            }
            StmtKind::FnDef(def) => {
                // Top-level functions were hoisted before the run started.
                if !env.same_frame(&self.globals) {
                    if let Some(name) = &def.name {
                        env.define(&name.name, Self::make_fn(def, env));
                    }
                }
                Ok(Flow::Normal)
            }
            StmtKind::Shell(shell) => self.exec_shell(shell, env),
            StmtKind::Display(display) => {
                self.exec_display(display, env)?;
                Ok(Flow::Normal)
            }
            StmtKind::JsonField { name, path } => {
                self.exec_json_field(name, path, env)?;
                Ok(Flow::Normal)
            }
        }
    }

    fn eval_values(&mut self, exprs: &[Expr], env: &Environment) -> EvalResult<Vec<Value>> {
        exprs.iter().map(|e| self.eval_expr(e, env)).collect()
    }

    /// Right-hand side of an assignment. A switch there may leave through
    /// `return`/`break`/`continue` instead of producing a value.
    fn eval_rhs(&mut self, expr: &Expr, env: &Environment) -> EvalResult<SwitchOutcome> {
        match &expr.kind {
            ExprKind::Switch(switch) => self.eval_switch_expr(switch, env),
            _ => self.eval_expr(expr, env).map(SwitchOutcome::Value),
        }
    }

    fn exec_assign(
        &mut self,
        targets: &[Target],
        value: &Expr,
        catch: Option<&Block>,
        env: &Environment,
    ) -> EvalResult<Flow> {
        let value = match (self.eval_rhs(value, env), catch) {
            (Ok(SwitchOutcome::Value(value)), _) => value,
            (Ok(SwitchOutcome::Escape(flow)), _) => return Ok(flow),
            (Err(err), Some(block)) if !err.is_exit() => {
                let error = err.to_error_value();
                for target in targets {
                    self.assign(target, error.clone(), env)?;
                }
                return self.exec_block(block, env);
            }
            (Err(err), _) => return Err(err),
        };
        self.assign_all(targets, value, env)?;
        Ok(Flow::Normal)
    }

    /// One target takes the value whole; several unpack a list.
    fn assign_all(&mut self, targets: &[Target], value: Value, env: &Environment) -> EvalResult<()> {
        if let [target] = targets {
            return self.assign(target, value, env);
        }
        let Value::List(list) = &value else {
            return Err(unpack_mismatch(&value, targets.len()));
        };
        let items = list.to_vec();
        if items.len() != targets.len() {
            return Err(output_count_mismatch(targets.len(), items.len()));
        }
        for (target, item) in targets.iter().zip(items) {
            self.assign(target, item, env)?;
        }
        Ok(())
    }

    fn exec_compound(
        &mut self,
        target: &Target,
        op: BinaryOp,
        value: &Expr,
        env: &Environment,
    ) -> EvalResult<()> {
        let current = self.read_target(target, env)?;
        let rhs = self.eval_expr(value, env)?;
        // `list += list` appends in place so aliases see the change.
        if let (BinaryOp::Add, Value::List(list), Value::List(other)) = (op, &current, &rhs) {
            let extra = other.to_vec();
            list.borrow_mut().extend(extra);
            return Ok(());
        }
        let result = match evaluate_binary(current.clone(), rhs.clone(), op) {
            Err(err) if matches!(err.kind, EvalErrorKind::InvalidOperands { .. }) => {
                return Err(invalid_operands(&current, op, &rhs, true).with_span(value.span));
            }
            other => other?,
        };
        self.assign(target, result, env)
    }

    /// Each branch's pre-statement runs before its condition, and stays in
    /// effect for the branches after it.
    fn exec_if(
        &mut self,
        branches: &[IfBranch],
        otherwise: Option<&Block>,
        env: &Environment,
    ) -> EvalResult<Flow> {
        for branch in branches {
            if let Some(pre) = &branch.pre {
                let flow = self.exec_stmt(pre, env)?;
                if !flow.is_normal() {
                    return Ok(flow);
                }
            }
            if self.eval_expr(&branch.cond, env)?.is_truthy() {
                return self.exec_block(&branch.body, env);
            }
        }
        match otherwise {
            Some(block) => self.exec_block(block, env),
            None => Ok(Flow::Normal),
        }
    }

    /// Iterates over a snapshot; mutating the source inside the body does
    /// not change the iteration.
    fn exec_for(&mut self, for_loop: &ForLoop, env: &Environment) -> EvalResult<Flow> {
        let source = self.eval_expr(&for_loop.iter, env)?;
        let items = iteration_items(&source).map_err(|e| e.with_span(for_loop.iter.span))?;
        for (idx, item) in items.into_iter().enumerate() {
            bind_loop_vars(&for_loop.vars, item, env)?;
            if let Some(ctx) = &for_loop.context {
                env.define(&ctx.name, loop_context(idx, &source));
            }
            match self.exec_block(&for_loop.body, env)?.into_loop_action() {
                LoopAction::Next => {}
                LoopAction::Exit => break,
                LoopAction::Propagate(flow) => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_while(&mut self, cond: Option<&Expr>, body: &Block, env: &Environment) -> EvalResult<Flow> {
        loop {
            if let Some(cond) = cond {
                if !self.eval_expr(cond, env)?.is_truthy() {
                    break;
                }
            }
            match self.exec_block(body, env)?.into_loop_action() {
                LoopAction::Next => {}
                LoopAction::Exit => break,
                LoopAction::Propagate(flow) => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }
}

/// What a `for` loop visits: list elements, string characters, or map
/// entries as `(key, Some(value))`.
pub(super) fn iteration_items(source: &Value) -> EvalResult<Vec<(Value, Option<Value>)>> {
    match source {
        Value::List(list) => Ok(list.to_vec().into_iter().map(|v| (v, None)).collect()),
        Value::Str(s) => Ok((0..s.char_len())
            .map(|i| (Value::Str(s.char_slice(i, i + 1)), None))
            .collect()),
        Value::Map(map) => Ok(map
            .entries()
            .into_iter()
            .map(|(k, v)| (k, Some(v)))
            .collect()),
        _ => Err(not_iterable(source)),
    }
}

/// Bind one iteration's item to the loop variables.
pub(super) fn bind_loop_vars(
    vars: &[Ident],
    item: (Value, Option<Value>),
    env: &Environment,
) -> EvalResult<()> {
    match (item, vars) {
        ((key, Some(_)), [var]) => env.define(&var.name, key),
        ((key, Some(value)), [key_var, value_var]) => {
            env.define(&key_var.name, key);
            env.define(&value_var.name, value);
        }
        ((_, Some(_)), _) => return Err(output_count_mismatch(2, vars.len())),
        ((value, None), [var]) => env.define(&var.name, value),
        ((value, None), _) => {
            let unpacked = match &value {
                Value::List(list) if list.len() == vars.len() => list.to_vec(),
                _ => {
                    return Err(unpack_mismatch(&value, vars.len()).with_hint(
                        "Use 'for item in items with loop:' and 'loop.idx' for the index",
                    ))
                }
            };
            for (var, value) in vars.iter().zip(unpacked) {
                env.define(&var.name, value);
            }
        }
    }
    Ok(())
}

/// The `with ctx` map: current index and the iterated value.
pub(super) fn loop_context(idx: usize, source: &Value) -> Value {
    let ctx = RadMap::new();
    ctx.set_str("idx", Value::Int(i64::try_from(idx).unwrap_or(i64::MAX)));
    ctx.set_str("src", source.clone());
    Value::Map(ctx)
}
