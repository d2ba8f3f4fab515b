//! Binary and unary operators.
//!
//! The value set is closed, so dispatch is a direct match on operand kinds.
//! `and`/`or` short-circuit in the interpreter; they are handled here too so
//! this function is total over [`BinaryOp`]. `and` always yields a bool.
//! `or` yields an operand, the left one when truthy, so `x or "default"`
//! works as a falsy fallback.

use std::cmp::Ordering;

use rad_diagnostic::ErrorCode;
use rad_ir::ast::{BinaryOp, UnaryOp};

use crate::errors::{
    division_by_zero, integer_overflow, invalid_operands, invalid_unary_operand, modulo_by_zero,
    other, EvalResult,
};
use crate::value::{RadString, Value};

#[inline]
fn checked_arith(result: Option<i64>, op_name: &'static str) -> EvalResult {
    result.map(Value::Int).ok_or_else(|| integer_overflow(op_name))
}

/// Evaluate `left op right`.
#[expect(
    clippy::needless_pass_by_value,
    reason = "callers hand over freshly evaluated operands"
)]
pub fn evaluate_binary(left: Value, right: Value, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Eq => return Ok(Value::Bool(left.equals(&right))),
        BinaryOp::NotEq => return Ok(Value::Bool(!left.equals(&right))),
        BinaryOp::And => return Ok(Value::Bool(left.is_truthy() && right.is_truthy())),
        BinaryOp::Or => return Ok(if left.is_truthy() { left } else { right }),
        BinaryOp::In => return membership(&left, &right, op).map(Value::Bool),
        BinaryOp::NotIn => return membership(&left, &right, op).map(|b| Value::Bool(!b)),
        _ => {}
    }

    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => eval_int_binary(*a, *b, op),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            match (left.as_float(), right.as_float()) {
                (Some(a), Some(b)) => eval_float_binary(a, b, op),
                _ => Err(invalid_operands(&left, op, &right, false)),
            }
        }
        (Value::Str(_) | Value::Error(_), Value::Str(_) | Value::Error(_)) => {
            match (left.as_rad_str(), right.as_rad_str()) {
                (Some(a), Some(b)) => eval_string_binary(a, b, op)
                    .unwrap_or_else(|| Err(invalid_operands(&left, op, &right, false))),
                _ => Err(invalid_operands(&left, op, &right, false)),
            }
        }
        (Value::Str(s), Value::Int(n)) | (Value::Int(n), Value::Str(s))
            if op == BinaryOp::Mul =>
        {
            repeat(s, *n)
        }
        (Value::List(a), Value::List(b)) if op == BinaryOp::Add => {
            let mut items = a.to_vec();
            items.extend(b.to_vec());
            Ok(Value::list(items))
        }
        _ => Err(invalid_operands(&left, op, &right, false)),
    }
}

fn eval_int_binary(a: i64, b: i64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => checked_arith(a.checked_add(b), "addition"),
        BinaryOp::Sub => checked_arith(a.checked_sub(b), "subtraction"),
        BinaryOp::Mul => checked_arith(a.checked_mul(b), "multiplication"),
        BinaryOp::Div => {
            if b == 0 {
                return Err(division_by_zero());
            }
            #[expect(clippy::cast_precision_loss, reason = "int division yields a float")]
            let quotient = a as f64 / b as f64;
            Ok(Value::Float(quotient))
        }
        BinaryOp::Mod => {
            if b == 0 {
                return Err(modulo_by_zero());
            }
            checked_arith(a.checked_rem(b), "modulo")
        }
        _ => Ok(Value::Bool(compare_ordered(a.cmp(&b), op))),
    }
}

fn eval_float_binary(a: f64, b: f64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Value::Float(a + b)),
        BinaryOp::Sub => Ok(Value::Float(a - b)),
        BinaryOp::Mul => Ok(Value::Float(a * b)),
        BinaryOp::Div => {
            if b == 0.0 {
                return Err(division_by_zero());
            }
            Ok(Value::Float(a / b))
        }
        BinaryOp::Mod => {
            if b == 0.0 {
                return Err(modulo_by_zero());
            }
            Ok(Value::Float(a % b))
        }
        _ => Ok(Value::Bool(
            a.partial_cmp(&b)
                .is_some_and(|ord| compare_ordered(ord, op)),
        )),
    }
}

/// `None` for operators strings do not support.
fn eval_string_binary(a: &RadString, b: &RadString, op: BinaryOp) -> Option<EvalResult> {
    match op {
        BinaryOp::Add => Some(Ok(Value::Str(a.concat(b)))),
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => Some(Ok(Value::Bool(
            compare_ordered(a.plain().cmp(&b.plain()), op),
        ))),
        _ => None,
    }
}

fn compare_ordered(ord: Ordering, op: BinaryOp) -> bool {
    match op {
        BinaryOp::Lt => ord.is_lt(),
        BinaryOp::LtEq => ord.is_le(),
        BinaryOp::Gt => ord.is_gt(),
        BinaryOp::GtEq => ord.is_ge(),
        _ => false,
    }
}

/// Largest string `*` will build, in bytes.
const MAX_REPEAT_BYTES: usize = 1 << 30;

fn repeat(s: &RadString, times: i64) -> EvalResult {
    let Ok(count) = usize::try_from(times) else {
        return Err(other(
            ErrorCode::NumInvalidRange,
            format!("Cannot repeat a string a negative number of times: {times}"),
        ));
    };
    match s.byte_len().checked_mul(count) {
        Some(bytes) if bytes <= MAX_REPEAT_BYTES => Ok(Value::Str(s.repeat(count))),
        _ => Err(other(
            ErrorCode::NumInvalidRange,
            format!("Cannot repeat a string {times} times: result exceeds {MAX_REPEAT_BYTES} bytes"),
        )),
    }
}

/// `needle in haystack`: substring, list element, or map key.
fn membership(needle: &Value, haystack: &Value, op: BinaryOp) -> EvalResult<bool> {
    match haystack {
        Value::Str(_) | Value::Error(_) => match (needle.as_rad_str(), haystack.as_rad_str()) {
            (Some(n), Some(h)) => Ok(h.plain().contains(n.plain().as_ref())),
            _ => Err(invalid_operands(needle, op, haystack, false)),
        },
        Value::List(list) => Ok(list.contains(needle)),
        Value::Map(map) => Ok(map.contains_key(needle)),
        _ => Err(invalid_operands(needle, op, haystack, false)),
    }
}

/// Evaluate a unary operator.
pub fn evaluate_unary(op: UnaryOp, value: &Value) -> EvalResult {
    match (op, value) {
        (UnaryOp::Not, v) => Ok(Value::Bool(!v.is_truthy())),
        (UnaryOp::Neg, Value::Int(i)) => i
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("negation")),
        (UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOp::Plus, Value::Int(_) | Value::Float(_)) => Ok(value.clone()),
        (UnaryOp::Neg | UnaryOp::Plus, _) => Err(invalid_unary_operand(op.as_symbol(), value)),
    }
}

/// Total order used by `sort`: null, bools, numbers, strings, lists, maps,
/// functions; within a kind by value.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::Str(_) | Value::Error(_) => 3,
            Value::List(_) => 4,
            Value::Map(_) => 5,
            Value::Fn(_) => 6,
        }
    }

    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            match (a.as_float(), b.as_float()) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            }
        }
        (Value::Str(_) | Value::Error(_), Value::Str(_) | Value::Error(_)) => {
            match (a.as_rad_str(), b.as_rad_str()) {
                (Some(x), Some(y)) => x.plain().cmp(&y.plain()),
                _ => Ordering::Equal,
            }
        }
        (Value::List(x), Value::List(y)) => {
            let (x, y) = (x.borrow(), y.borrow());
            x.iter()
                .zip(y.iter())
                .map(|(p, q)| compare_values(p, q))
                .find(|ord| ord.is_ne())
                .unwrap_or_else(|| x.len().cmp(&y.len()))
        }
        _ => rank(a).cmp(&rank(b)),
    }
}
