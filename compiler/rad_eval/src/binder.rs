//! Binding call arguments to declared parameters.
//!
//! The same binder serves script functions and builtins; builtin signatures
//! are parsed from Rad source so both go through identical arity, naming,
//! default and type rules.

use rad_ir::ast::{Expr, Ident, Param};
use rad_ir::{Span, Type};

use crate::errors::{binding_error, scientific_not_whole, scientific_out_of_range, EvalResult};
use crate::typing::{self, NotAnInt};
use crate::value::Value;

/// An evaluated positional argument.
#[derive(Clone, Debug)]
pub struct ArgValue {
    pub value: Value,
    pub span: Span,
    /// The argument was written as a scientific-notation literal.
    pub scientific: bool,
}

impl ArgValue {
    pub fn new(value: Value, span: Span) -> Self {
        ArgValue {
            value,
            span,
            scientific: false,
        }
    }
}

/// An evaluated `name=value` argument.
#[derive(Clone, Debug)]
pub struct NamedArgValue {
    pub name: Ident,
    pub arg: ArgValue,
}

/// Parameters bound to values, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct BoundArgs {
    entries: Vec<(String, Value)>,
}

impl BoundArgs {
    /// Value bound to `name`; `null` if the parameter does not exist.
    pub fn get(&self, name: &str) -> Value {
        self.find(name).cloned().unwrap_or(Value::Null)
    }

    /// Value bound to `name` unless it is `null`.
    pub fn opt(&self, name: &str) -> Option<&Value> {
        self.find(name).filter(|v| !matches!(v, Value::Null))
    }

    fn find(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find_map(|(n, v)| (n == name).then_some(v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Slot {
    Unbound,
    Positional,
    Named,
}

/// Bind `positional` and `named` to `params`.
///
/// `eval_default` evaluates a parameter's default expression in the
/// function's defining environment; it runs fresh on every call.
///
/// # Errors
///
/// Arity, naming and type failures, each carrying the span that best points
/// at the offending argument (or `call_span` for missing arguments).
#[tracing::instrument(level = "trace", skip_all, fields(params = params.len()))]
pub fn bind_args<F>(
    params: &[Param],
    positional: Vec<ArgValue>,
    named: Vec<NamedArgValue>,
    call_span: Span,
    mut eval_default: F,
) -> EvalResult<BoundArgs>
where
    F: FnMut(&Param, &Expr) -> EvalResult<Value>,
{
    let mut slots = vec![Slot::Unbound; params.len()];
    let mut values: Vec<Value> = vec![Value::Null; params.len()];

    let variadic_idx = params.iter().position(|p| p.variadic);
    let positional_params = params
        .iter()
        .take_while(|p| !p.variadic && !p.named_only)
        .count();

    let total_positional = positional.len();
    let mut args = positional.into_iter();
    for idx in 0..positional_params {
        let Some(arg) = args.next() else { break };
        values[idx] = check_arg(&params[idx], arg)?;
        slots[idx] = Slot::Positional;
    }

    if let Some(vidx) = variadic_idx {
        let param = &params[vidx];
        let elem_ty = param.ty.clone().unwrap_or(Type::Any);
        let mut items = Vec::new();
        for arg in args.by_ref() {
            let span = arg.span;
            items.push(check_value(&elem_ty, arg).map_err(|e| e.with_span(span))?);
        }
        values[vidx] = Value::list(items);
        slots[vidx] = Slot::Positional;
    } else if let Some(first_excess) = args.next() {
        let has_named_only = params.iter().any(|p| p.named_only);
        return Err(if has_named_only {
            binding_error("Too many positional args, remaining args are named-only.".into())
                .with_span(first_excess.span)
        } else {
            binding_error(format!(
                "Expected at most {positional_params} args, but was invoked with {total_positional}"
            ))
            .with_span(call_span)
        });
    }

    for NamedArgValue { name, arg } in named {
        let Some(idx) = params.iter().position(|p| p.name.name == name.name) else {
            return Err(
                binding_error(format!("Unknown named argument '{}'", name.name))
                    .with_span(name.span),
            );
        };
        let param = &params[idx];
        if param.positional_only() {
            return Err(binding_error(format!(
                "Argument '{}' cannot be passed as named arg, only positionally.",
                name.name
            ))
            .with_span(name.span));
        }
        match slots[idx] {
            Slot::Positional if !(param.variadic && is_empty_list(&values[idx])) => {
                return Err(
                    binding_error(format!("Argument '{}' already specified.", name.name))
                        .with_span(name.span),
                );
            }
            Slot::Named => {
                return Err(
                    binding_error(format!("Duplicate named argument: {}", name.name))
                        .with_span(name.span),
                );
            }
            Slot::Positional | Slot::Unbound => {}
        }
        values[idx] = if param.variadic {
            let list_ty = Type::List(Box::new(param.ty.clone().unwrap_or(Type::Any)));
            let span = arg.span;
            typing::check(arg.value, &list_ty).map_err(|e| e.with_span(span))?
        } else {
            check_arg(param, arg)?
        };
        slots[idx] = Slot::Named;
    }

    for (idx, param) in params.iter().enumerate() {
        if slots[idx] != Slot::Unbound {
            continue;
        }
        values[idx] = if let Some(default) = &param.default {
            let value = eval_default(param, default)?;
            check_arg(
                param,
                ArgValue {
                    value,
                    span: default.span,
                    scientific: default.is_scientific_literal(),
                },
            )?
        } else if param.optional {
            Value::Null
        } else {
            return Err(binding_error(format!(
                "Missing required argument '{}'",
                param.name.name
            ))
            .with_span(call_span));
        };
    }

    let entries = params
        .iter()
        .map(|p| p.name.name.clone())
        .zip(values)
        .collect();
    Ok(BoundArgs { entries })
}

fn is_empty_list(value: &Value) -> bool {
    value.as_list().is_some_and(|l| l.is_empty())
}

fn check_arg(param: &Param, arg: ArgValue) -> EvalResult<Value> {
    if param.optional && matches!(arg.value, Value::Null) {
        return Ok(Value::Null);
    }
    let span = arg.span;
    let ty = param.ty.clone().unwrap_or(Type::Any);
    check_value(&ty, arg).map_err(|e| e.with_span(span))
}

fn check_value(ty: &Type, arg: ArgValue) -> EvalResult<Value> {
    if arg.scientific && typing::wants_int_only(ty) {
        if let Value::Float(f) = arg.value {
            let int = typing::scientific_int(f).map_err(|reason| match reason {
                NotAnInt::Fractional => scientific_not_whole(f),
                NotAnInt::OutOfRange => scientific_out_of_range(f),
            })?;
            return typing::check(Value::Int(int), ty);
        }
    }
    typing::check(arg.value, ty)
}

#[cfg(test)]
mod tests;
