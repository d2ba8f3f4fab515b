//! Conversions between value kinds.

use rad_diagnostic::ErrorCode;

use super::{some, str_arg, CallCtx, Entry};
use crate::binder::BoundArgs;
use crate::errors::{other, EvalResult};
use crate::format::to_rad_string;
use crate::interpreter::Interpreter;
use crate::json;
use crate::value::Value;

pub(super) const ENTRIES: &[Entry] = &[
    (r"str(_var: any) -> str", to_str),
    (r"int(_var: any) -> int", to_int),
    (r"float(_var: any) -> float", to_float),
    (r"parse_int(_str: str) -> int", parse_int),
    (r"parse_float(_str: str) -> float", parse_float),
    (r"type_of(_var: any) -> str", type_of),
    (r"parse_json(_str: str) -> any", parse_json),
    (r"to_json(_item: any) -> str", to_json),
];

/// Attributes of a string argument survive.
fn to_str(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    some(to_rad_string(&args.get("_var")))
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "float to int truncates toward zero after a range check"
)]
fn to_int(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    match args.get("_var") {
        Value::Int(i) => some(i),
        Value::Bool(b) => some(i64::from(b)),
        Value::Float(f) if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            some(f.trunc() as i64)
        }
        Value::Float(f) => Err(other(
            ErrorCode::Cast,
            format!("Cannot cast float {f} to int: out of range"),
        )),
        Value::Str(s) => Err(other(
            ErrorCode::Cast,
            format!("Cannot cast \"{}\" to int", s.plain()),
        )
        .with_hint("Use parse_int to parse strings")),
        value => Err(other(
            ErrorCode::Cast,
            format!("Cannot cast {} to int", value.type_name()),
        )),
    }
}

fn to_float(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    match args.get("_var") {
        value @ (Value::Int(_) | Value::Float(_)) => some(value.as_float().unwrap_or_default()),
        Value::Bool(b) => some(if b { 1.0 } else { 0.0 }),
        Value::Str(s) => Err(other(
            ErrorCode::Cast,
            format!("Cannot cast \"{}\" to float", s.plain()),
        )
        .with_hint("Use parse_float to parse strings")),
        value => Err(other(
            ErrorCode::Cast,
            format!("Cannot cast {} to float", value.type_name()),
        )),
    }
}

fn parse_int(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let text = str_arg(args, "_str")?;
    let plain = text.plain();
    match plain.parse::<i64>() {
        Ok(i) => some(i),
        Err(_) => Err(other(
            ErrorCode::ParseIntFailed,
            format!("parse_int() failed to parse \"{plain}\""),
        )),
    }
}

fn parse_float(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let text = str_arg(args, "_str")?;
    let plain = text.plain();
    match plain.parse::<f64>() {
        Ok(f) => some(f),
        Err(_) => Err(other(
            ErrorCode::ParseFloatFailed,
            format!("parse_float() failed to parse \"{plain}\""),
        )),
    }
}

fn type_of(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    some(args.get("_var").type_name())
}

fn parse_json(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    let text = str_arg(args, "_str")?;
    json::parse(&text.plain())
        .map(Some)
        .map_err(|e| other(ErrorCode::ParseJson, e.to_string()))
}

fn to_json(_: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    json::to_string(&args.get("_item"))
        .map(|text| Some(Value::str(text)))
        .map_err(|e| other(ErrorCode::ParseJson, e.to_string()))
}
