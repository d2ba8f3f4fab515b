//! Function call evaluation methods for the Interpreter.

use std::rc::Rc;

use rad_ir::ast::{Expr, ExprKind, FnBody, FnDef, NamedArg};
use rad_ir::{Span, Type};
use rad_stack::ensure_sufficient_stack;

use super::{escaped_flow, Interpreter};
use crate::binder::{bind_args, ArgValue, NamedArgValue};
use crate::builtins::{Builtin, CallCtx};
use crate::diagnostics::CallFrame;
use crate::environment::Environment;
use crate::errors::{
    not_callable, type_mismatch, unknown_function, void_value, EvalError, EvalResult,
};
use crate::flow::{pack_values, Flow};
use crate::typing;
use crate::value::{FnValue, UserFn, Value};

impl Interpreter<'_> {
    /// Evaluate a `Call` or `MethodCall` node. `None` means the callee
    /// produced no value.
    pub(super) fn eval_call_expr(
        &mut self,
        expr: &Expr,
        env: &Environment,
    ) -> EvalResult<Option<Value>> {
        match &expr.kind {
            ExprKind::Call {
                callee,
                args,
                named,
            } => {
                let func = self.resolve_callee(callee, env)?;
                let positional = self.eval_args(args, env)?;
                let named = self.eval_named_args(named, env)?;
                self.call_function(&func, positional, named, expr.span, env)
            }
            ExprKind::MethodCall {
                receiver,
                method,
                args,
                named,
            } => {
                let recv = self.eval_expr(receiver, env)?;
                // A map holding a function under this key calls it directly.
                if let Value::Map(map) = &recv {
                    if let Some(Value::Fn(func)) = map.get_str(&method.name) {
                        let positional = self.eval_args(args, env)?;
                        let named = self.eval_named_args(named, env)?;
                        return self.call_function(&func, positional, named, expr.span, env);
                    }
                }
                let func = self
                    .resolve_function(&method.name, env)
                    .map_err(|e| e.with_span(method.span))?;
                let mut positional = vec![ArgValue::new(recv, receiver.span)];
                positional.extend(self.eval_args(args, env)?);
                let named = self.eval_named_args(named, env)?;
                self.call_function(&func, positional, named, expr.span, env)
            }
            _ => self.eval_expr(expr, env).map(Some),
        }
    }

    fn resolve_callee(&mut self, callee: &Expr, env: &Environment) -> EvalResult<FnValue> {
        if let ExprKind::Ident(name) = &callee.kind {
            return self
                .resolve_function(name, env)
                .map_err(|e| e.with_span(callee.span));
        }
        match self.eval_expr(callee, env)? {
            Value::Fn(func) => Ok(func),
            other => Err(not_callable("<expression>", &other).with_span(callee.span)),
        }
    }

    /// Variables shadow builtins of the same name.
    fn resolve_function(&self, name: &str, env: &Environment) -> EvalResult<FnValue> {
        match env.lookup(name) {
            Some(Value::Fn(func)) => Ok(func),
            Some(other) => Err(not_callable(name, &other)),
            None => self
                .builtins
                .get(name)
                .map(|builtin| FnValue::Builtin(Rc::clone(builtin)))
                .ok_or_else(|| unknown_function(name)),
        }
    }

    fn eval_args(&mut self, args: &[Expr], env: &Environment) -> EvalResult<Vec<ArgValue>> {
        args.iter()
            .map(|arg| {
                Ok(ArgValue {
                    value: self.eval_expr(arg, env)?,
                    span: arg.span,
                    scientific: arg.is_scientific_literal(),
                })
            })
            .collect()
    }

    fn eval_named_args(
        &mut self,
        named: &[NamedArg],
        env: &Environment,
    ) -> EvalResult<Vec<NamedArgValue>> {
        named
            .iter()
            .map(|arg| {
                Ok(NamedArgValue {
                    name: arg.name.clone(),
                    arg: ArgValue {
                        value: self.eval_expr(&arg.value, env)?,
                        span: arg.value.span,
                        scientific: arg.value.is_scientific_literal(),
                    },
                })
            })
            .collect()
    }

    /// Call `func` with already-evaluated arguments. `env` is the caller's
    /// scope, which only builtins see.
    #[tracing::instrument(level = "debug", skip_all, fields(function = func.name().unwrap_or("<lambda>")))]
    pub(crate) fn call_function(
        &mut self,
        func: &FnValue,
        args: Vec<ArgValue>,
        named: Vec<NamedArgValue>,
        span: Span,
        env: &Environment,
    ) -> EvalResult<Option<Value>> {
        match func {
            FnValue::Builtin(builtin) => self.call_builtin(builtin, args, named, span, env),
            FnValue::User(user) => self.call_user(user, args, named, span),
        }
    }

    /// Call a function value from native code, e.g. the callback given to
    /// `map` or `filter`.
    pub(crate) fn invoke(&mut self, callee: &Value, args: Vec<Value>, span: Span) -> EvalResult<Value> {
        let Value::Fn(func) = callee else {
            return Err(not_callable("<value>", callee).with_span(span));
        };
        let args = args.into_iter().map(|v| ArgValue::new(v, span)).collect();
        let env = self.globals.clone();
        self.call_function(func, args, Vec::new(), span, &env)?
            .ok_or_else(|| void_value(func.name().unwrap_or("<lambda>")).with_span(span))
    }

    fn call_builtin(
        &mut self,
        builtin: &Rc<Builtin>,
        args: Vec<ArgValue>,
        named: Vec<NamedArgValue>,
        span: Span,
        env: &Environment,
    ) -> EvalResult<Option<Value>> {
        // Builtin defaults are literals; they need no particular scope.
        let scratch = Environment::new();
        let bound = bind_args(&builtin.params, args, named, span, |_, default| {
            self.eval_expr(default, &scratch)
        })?;
        let ctx = CallCtx {
            span,
            env: env.clone(),
        };
        (builtin.func)(self, &ctx, &bound).map_err(|e| e.or_span(span))
    }

    fn call_user(
        &mut self,
        user: &Rc<UserFn>,
        args: Vec<ArgValue>,
        named: Vec<NamedArgValue>,
        span: Span,
    ) -> EvalResult<Option<Value>> {
        let def = Rc::clone(&user.def);
        let closure = user.closure.clone();
        let bound = bind_args(&def.params, args, named, span, |_, default| {
            self.eval_expr(default, &closure)
        })?;

        let frame = closure.child();
        for (name, value) in bound.iter() {
            frame.define(name, value.clone());
        }

        self.call_stack.push(CallFrame {
            name: def.display_name().to_string(),
            call_span: span,
        })?;
        let result = ensure_sufficient_stack(|| self.eval_body(&def, &frame))
            .map_err(|e| self.call_stack.attach_backtrace(e));
        self.call_stack.pop();

        check_return(&def, result?).map_err(|e| e.or_span(span))
    }

    fn eval_body(&mut self, def: &FnDef, frame: &Environment) -> EvalResult<Option<Value>> {
        match &def.body {
            FnBody::Expr(expr) => self.eval_maybe_void(expr, frame),
            FnBody::Block(block) => match self.exec_block(block, frame)? {
                Flow::Return(values) => Ok(pack_values(values)),
                Flow::Normal => Ok(None),
                flow => escaped_flow(flow).map(|()| None),
            },
        }
    }
}

/// Enforce the declared return type. An `error` value escaping a call is
/// raised as a failure.
fn check_return(def: &FnDef, produced: Option<Value>) -> EvalResult<Option<Value>> {
    let declared = def.return_type.as_ref();
    match produced {
        None => match declared {
            Some(ty) if !ty.allows_fallthrough() => Err(type_mismatch(format!(
                "Expected '{ty}', but got void value."
            ))),
            _ => Ok(None),
        },
        Some(Value::Error(err)) => Err(EvalError::from_error_value(err)),
        Some(value) => match declared {
            None => Ok(Some(value)),
            Some(Type::Void) => Err(type_mismatch(format!(
                "Expected no return value from '{}', but got '{}'",
                def.display_name(),
                value.repr(false)
            ))),
            Some(ty) => typing::check(value, ty).map(Some),
        },
    }
}
