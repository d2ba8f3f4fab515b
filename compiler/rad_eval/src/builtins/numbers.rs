//! Numeric builtins.

use rad_diagnostic::ErrorCode;

use super::{int_arg, num_arg, some, CallCtx, Entry};
use crate::binder::BoundArgs;
use crate::errors::{integer_overflow, other, EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::Value;

pub(super) const ENTRIES: &[Entry] = &[
    (r"abs(_num: num) -> num", abs),
    (r"round(_num: num, _decimals: int = 0) -> num", round),
    (r"floor(_num: num) -> int", floor),
    (r"ceil(_num: num) -> int", ceil),
    (r"pow(_base: num, _exponent: num) -> float", pow),
    (r"clamp(val: num, min: num, max: num) -> num", clamp),
];

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "whole floats within i64 range convert exactly"
)]
fn whole_to_int(f: f64, op: &'static str) -> EvalResult<i64> {
    // `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
    if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Ok(f as i64)
    } else {
        Err(integer_overflow(op))
    }
}

fn abs(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    match args.get("_num") {
        Value::Int(i) => some(i.checked_abs().ok_or_else(|| integer_overflow("abs"))?),
        _ => some(num_arg(args, "_num")?.abs()),
    }
}

/// Half away from zero. No decimals yields an int.
fn round(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let decimals = int_arg(args, "_decimals")?;
    if decimals < 0 {
        return Err(other(
            ErrorCode::NumInvalidRange,
            format!("Decimals cannot be negative, got {decimals}"),
        ));
    }
    if let Value::Int(i) = args.get("_num") {
        return some(i);
    }
    let num = num_arg(args, "_num")?;
    if decimals == 0 {
        return some(whole_to_int(num.round(), "round")?);
    }
    let exponent = i32::try_from(decimals).unwrap_or(i32::MAX);
    let factor = 10f64.powi(exponent);
    if !factor.is_finite() {
        return some(num);
    }
    some((num * factor).round() / factor)
}

fn floor(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    match args.get("_num") {
        Value::Int(i) => some(i),
        _ => some(whole_to_int(num_arg(args, "_num")?.floor(), "floor")?),
    }
}

fn ceil(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    match args.get("_num") {
        Value::Int(i) => some(i),
        _ => some(whole_to_int(num_arg(args, "_num")?.ceil(), "ceil")?),
    }
}

fn pow(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let base = num_arg(args, "_base")?;
    let exponent = num_arg(args, "_exponent")?;
    some(base.powf(exponent))
}

#[cold]
fn inverted_bounds(min: &Value, max: &Value) -> EvalError {
    other(
        ErrorCode::NumInvalidRange,
        format!(
            "min must be <= max, got min={} and max={}",
            min.repr(false),
            max.repr(false)
        ),
    )
}

/// Ints stay ints when all three arguments are ints.
fn clamp(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let (val, lo, hi) = (args.get("val"), args.get("min"), args.get("max"));
    if let (Value::Int(v), Value::Int(l), Value::Int(h)) = (&val, &lo, &hi) {
        if l > h {
            return Err(inverted_bounds(&lo, &hi));
        }
        return some((*v).clamp(*l, *h));
    }
    let (v, l, h) = (
        num_arg(args, "val")?,
        num_arg(args, "min")?,
        num_arg(args, "max")?,
    );
    if l > h {
        return Err(inverted_bounds(&lo, &hi));
    }
    some(v.clamp(l, h))
}
