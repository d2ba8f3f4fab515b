//! Expression evaluation.

use std::rc::Rc;

use rad_diagnostic::ErrorCode;
use rad_ir::ast::{BinaryOp, Expr, ExprKind, ListComp, StringPart};
use rad_stack::ensure_sufficient_stack;

use super::switch::SwitchOutcome;
use super::{escaped_flow, Interpreter};
use crate::environment::Environment;
use crate::errors::{
    cannot_index, index_out_of_bounds, invalid_map_key, key_not_found, other,
    undefined_variable, void_value, EvalResult,
};
use crate::format::format_interp;
use crate::operators::{evaluate_binary, evaluate_unary};
use crate::value::{FnValue, RadMap, RadString, UserFn, Value};

impl Interpreter<'_> {
    /// Evaluate an expression that must produce a value.
    pub(crate) fn eval_expr(&mut self, expr: &Expr, env: &Environment) -> EvalResult<Value> {
        ensure_sufficient_stack(|| self.eval_expr_inner(expr, env)).map_err(|e| e.or_span(expr.span))
    }

    /// Evaluate an expression that may be a call producing nothing.
    pub(super) fn eval_maybe_void(
        &mut self,
        expr: &Expr,
        env: &Environment,
    ) -> EvalResult<Option<Value>> {
        match &expr.kind {
            ExprKind::Call { .. } | ExprKind::MethodCall { .. } => {
                ensure_sufficient_stack(|| self.eval_call_expr(expr, env))
                    .map_err(|e| e.or_span(expr.span))
            }
            _ => self.eval_expr(expr, env).map(Some),
        }
    }

    fn eval_expr_inner(&mut self, expr: &Expr, env: &Environment) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Int(i) => Ok(Value::Int(*i)),
            ExprKind::Float { value, .. } => Ok(Value::Float(*value)),
            ExprKind::Str(parts) => self.eval_string(parts, env).map(Value::Str),
            ExprKind::List(items) => {
                let values = items
                    .iter()
                    .map(|item| self.eval_expr(item, env))
                    .collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::list(values))
            }
            ExprKind::Map(entries) => {
                let mut pairs = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    pairs.push((self.eval_expr(key, env)?, self.eval_expr(value, env)?));
                }
                RadMap::from_pairs(pairs)
                    .map(Value::Map)
                    .map_err(|bad_key| invalid_map_key(&bad_key))
            }
            ExprKind::ListComp(comp) => self.eval_list_comp(comp, env),
            ExprKind::Ident(name) => self.lookup_name(name, env),

            ExprKind::Binary { op, left, right } => self.eval_binary(*op, left, right, env),
            ExprKind::Unary { op, operand } => {
                let value = self.eval_expr(operand, env)?;
                evaluate_unary(*op, &value)
            }
            ExprKind::Ternary {
                cond,
                then,
                otherwise,
            } => {
                if self.eval_expr(cond, env)?.is_truthy() {
                    self.eval_expr(then, env)
                } else {
                    self.eval_expr(otherwise, env)
                }
            }
            ExprKind::Fallback { left, right } => match self.eval_expr(left, env) {
                Err(err) if !err.is_exit() => self.eval_expr(right, env),
                result => result,
            },
            ExprKind::Catch(inner) => match self.eval_maybe_void(inner, env) {
                Ok(value) => Ok(value.unwrap_or(Value::Null)),
                Err(err) if !err.is_exit() => Ok(err.to_error_value()),
                Err(err) => Err(err),
            },

            ExprKind::Index { base, index } => {
                let base = self.eval_expr(base, env)?;
                let index_value = self.eval_expr(index, env)?;
                get_index(&base, &index_value).map_err(|e| e.with_span(index.span))
            }
            ExprKind::Slice { base, start, end } => {
                let base = self.eval_expr(base, env)?;
                let start = self.eval_slice_bound(start.as_deref(), env)?;
                let end = self.eval_slice_bound(end.as_deref(), env)?;
                slice(&base, start, end)
            }
            ExprKind::Field { base, name } => {
                let base = self.eval_expr(base, env)?;
                get_field(&base, &name.name).map_err(|e| e.with_span(name.span))
            }
            ExprKind::Call { .. } | ExprKind::MethodCall { .. } => {
                let produced = self.eval_call_expr(expr, env)?;
                produced.ok_or_else(|| void_value(&call_name(expr)))
            }

            ExprKind::Lambda(def) => Ok(Self::make_fn(def, env)),
            ExprKind::Switch(switch) => match self.eval_switch_expr(switch, env)? {
                SwitchOutcome::Value(value) => Ok(value),
                SwitchOutcome::Escape(flow) => escaped_flow(flow).map(|()| Value::Null),
            },
        }
    }

    /// A function value closing over `env`.
    pub(super) fn make_fn(def: &Rc<rad_ir::ast::FnDef>, env: &Environment) -> Value {
        Value::Fn(FnValue::User(Rc::new(UserFn {
            def: Rc::clone(def),
            closure: env.clone(),
        })))
    }

    /// Variables first, then builtins, so scripts can shadow a builtin.
    fn lookup_name(&self, name: &str, env: &Environment) -> EvalResult<Value> {
        if let Some(value) = env.lookup(name) {
            return Ok(value);
        }
        match self.builtins.get(name) {
            Some(builtin) => Ok(Value::Fn(FnValue::Builtin(Rc::clone(builtin)))),
            None => Err(undefined_variable(name)),
        }
    }

    fn eval_string(&mut self, parts: &[StringPart], env: &Environment) -> EvalResult<RadString> {
        let mut out = RadString::new("");
        for part in parts {
            let piece = match part {
                StringPart::Text(text) => RadString::new(text.as_str()),
                StringPart::Interp { expr, format } => {
                    let value = self.eval_expr(expr, env)?;
                    format_interp(&value, format.as_ref()).map_err(|e| e.with_span(expr.span))?
                }
            };
            out = out.concat(&piece);
        }
        Ok(out)
    }

    /// `and`/`or` evaluate the right side only when needed.
    fn eval_binary(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        env: &Environment,
    ) -> EvalResult<Value> {
        let lhs = self.eval_expr(left, env)?;
        match op {
            BinaryOp::And if !lhs.is_truthy() => Ok(Value::Bool(false)),
            BinaryOp::Or if lhs.is_truthy() => Ok(lhs),
            _ => {
                let rhs = self.eval_expr(right, env)?;
                evaluate_binary(lhs, rhs, op)
            }
        }
    }

    fn eval_slice_bound(&mut self, bound: Option<&Expr>, env: &Environment) -> EvalResult<Option<i64>> {
        let Some(bound) = bound else {
            return Ok(None);
        };
        match self.eval_expr(bound, env)? {
            Value::Int(i) => Ok(Some(i)),
            Value::Null => Ok(None),
            value => Err(other(
                ErrorCode::CannotIndex,
                format!("Slice bounds must be ints, got {}", value.type_name()),
            )
            .with_span(bound.span)),
        }
    }

    /// Comprehension variables live in their own frame and do not leak.
    fn eval_list_comp(&mut self, comp: &ListComp, env: &Environment) -> EvalResult<Value> {
        let source = self.eval_expr(&comp.iter, env)?;
        let scope = env.child();
        let mut out = Vec::new();
        for (idx, item) in super::stmt::iteration_items(&source)?.into_iter().enumerate() {
            super::stmt::bind_loop_vars(&comp.vars, item, &scope)?;
            if let Some(ctx) = &comp.context {
                scope.define(&ctx.name, super::stmt::loop_context(idx, &source));
            }
            if let Some(cond) = &comp.cond {
                if !self.eval_expr(cond, &scope)?.is_truthy() {
                    continue;
                }
            }
            out.push(self.eval_expr(&comp.expr, &scope)?);
        }
        Ok(Value::list(out))
    }
}

/// Name used when a call produced no value where one was needed.
pub(super) fn call_name(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Call { callee, .. } => match &callee.kind {
            ExprKind::Ident(name) => name.clone(),
            _ => "<lambda>".to_string(),
        },
        ExprKind::MethodCall { method, .. } => method.name.clone(),
        _ => "<expression>".to_string(),
    }
}

/// Resolve a possibly negative index against `len`.
pub(super) fn resolve_index(index: i64, len: usize) -> EvalResult<usize> {
    let signed_len = i64::try_from(len).unwrap_or(i64::MAX);
    let resolved = if index < 0 { signed_len + index } else { index };
    if (0..signed_len).contains(&resolved) {
        usize::try_from(resolved).map_err(|_| index_out_of_bounds(index, len))
    } else {
        Err(index_out_of_bounds(index, len))
    }
}

fn int_index(index: &Value, base: &Value) -> EvalResult<i64> {
    index.as_int().ok_or_else(|| {
        other(
            ErrorCode::CannotIndex,
            format!(
                "Cannot index {} with {}, expected an int",
                base.type_name(),
                index.type_name()
            ),
        )
    })
}

/// `base[index]` for lists, strings (by character) and maps.
pub(super) fn get_index(base: &Value, index: &Value) -> EvalResult<Value> {
    match base {
        Value::List(list) => {
            let i = resolve_index(int_index(index, base)?, list.len())?;
            list.get(i).ok_or_else(|| index_out_of_bounds(i64::try_from(i).unwrap_or(i64::MAX), list.len()))
        }
        Value::Str(s) => {
            let i = resolve_index(int_index(index, base)?, s.char_len())?;
            Ok(Value::Str(s.char_slice(i, i + 1)))
        }
        Value::Map(map) => map.get(index).ok_or_else(|| key_not_found(index)),
        _ => Err(cannot_index(base)),
    }
}

/// `base.name`, which only maps support.
pub(super) fn get_field(base: &Value, name: &str) -> EvalResult<Value> {
    match base {
        Value::Map(map) => map
            .get_str(name)
            .ok_or_else(|| key_not_found(&Value::str(name))),
        _ => Err(cannot_index(base)),
    }
}

/// Clamp a slice bound into `0..=len`; negative bounds count from the end.
fn clamp_bound(bound: i64, len: usize) -> usize {
    let signed_len = i64::try_from(len).unwrap_or(i64::MAX);
    let resolved = if bound < 0 { signed_len + bound } else { bound };
    usize::try_from(resolved.clamp(0, signed_len)).unwrap_or(0)
}

fn slice(base: &Value, start: Option<i64>, end: Option<i64>) -> EvalResult<Value> {
    let len = match base {
        Value::List(list) => list.len(),
        Value::Str(s) => s.char_len(),
        _ => return Err(cannot_index(base)),
    };
    let from = start.map_or(0, |s| clamp_bound(s, len));
    let to = end.map_or(len, |e| clamp_bound(e, len)).max(from);
    Ok(match base {
        Value::List(list) => Value::list(list.borrow()[from..to].to_vec()),
        Value::Str(s) => Value::Str(s.char_slice(from, to)),
        _ => return Err(cannot_index(base)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ints(values: &[i64]) -> Value {
        Value::list(values.iter().copied().map(Value::Int).collect())
    }

    #[test]
    fn test_negative_indices_count_from_end() {
        assert_eq!(resolve_index(-1, 3).ok(), Some(2));
        assert_eq!(resolve_index(0, 3).ok(), Some(0));
        assert!(resolve_index(3, 3).is_err());
        assert!(resolve_index(-4, 3).is_err());
    }

    #[test]
    fn test_string_index_is_by_character() {
        let value = get_index(&Value::str("héllo"), &Value::Int(1)).ok();
        assert_eq!(value, Some(Value::str("é")));
    }

    #[test]
    fn test_missing_key_is_key_not_found() {
        let map = RadMap::new();
        let err = get_index(&Value::Map(map), &Value::str("k")).err().map(|e| e.code());
        assert_eq!(err, Some(ErrorCode::KeyNotFound));
    }

    #[test]
    fn test_slices_clamp() {
        let list = ints(&[1, 2, 3, 4]);
        assert_eq!(slice(&list, Some(1), Some(3)).ok(), Some(ints(&[2, 3])));
        assert_eq!(slice(&list, Some(-2), None).ok(), Some(ints(&[3, 4])));
        assert_eq!(slice(&list, Some(3), Some(1)).ok(), Some(ints(&[])));
        assert_eq!(slice(&list, None, Some(99)).ok(), Some(list.clone()));
        assert_eq!(
            slice(&Value::str("hello"), Some(1), Some(-1)).ok(),
            Some(Value::str("ell"))
        );
    }
}
