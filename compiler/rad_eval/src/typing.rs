//! Checking runtime values against declared types.
//!
//! Matching is structural. `float` accepts ints everywhere, but the value is
//! only widened to a float where the declared type names `float` directly:
//! at the top level, under `?`, or in a union that has `float` and no `int`.
//! Elements of containers keep their runtime kind.

use rad_ir::Type;

use crate::errors::{type_mismatch, EvalError};
use crate::value::{MapKey, Value};

/// Whether `value` conforms to `ty`.
pub fn is_assignable(value: &Value, ty: &Type) -> bool {
    match ty {
        Type::Any => true,
        Type::Void => false,
        Type::Str => matches!(value, Value::Str(_)),
        Type::Int => matches!(value, Value::Int(_)),
        Type::Float => matches!(value, Value::Int(_) | Value::Float(_)),
        Type::Bool => matches!(value, Value::Bool(_)),
        Type::Error => matches!(value, Value::Error(_)),
        Type::Fn => matches!(value, Value::Fn(_)),
        Type::Optional(inner) => matches!(value, Value::Null) || is_assignable(value, inner),
        Type::Union(members) => members.iter().any(|m| is_assignable(value, m)),
        Type::List(elem) => value
            .as_list()
            .is_some_and(|list| list.borrow().iter().all(|v| is_assignable(v, elem))),
        Type::Tuple(elems) => value.as_list().is_some_and(|list| {
            let items = list.borrow();
            items.len() == elems.len()
                && items.iter().zip(elems).all(|(v, t)| is_assignable(v, t))
        }),
        Type::Map(key_ty, value_ty) => value.as_map().is_some_and(|map| {
            map.borrow()
                .iter()
                .all(|(k, v)| is_assignable(k, key_ty) && is_assignable(v, value_ty))
        }),
        Type::Struct(fields) => value.as_map().is_some_and(|map| {
            let data = map.borrow();
            let declared_keys_only = data.keys().all(|k| {
                MapKey::from_value(k).is_some_and(|key| {
                    fields
                        .iter()
                        .any(|f| key == MapKey::Str(f.key.clone()))
                })
            });
            declared_keys_only
                && fields.iter().all(|field| {
                    match data.get(&Value::str(field.key.as_str())) {
                        Some(v) => is_assignable(v, &field.ty),
                        None => field.optional,
                    }
                })
        }),
        Type::Enum(values) => match value {
            Value::Str(s) => values.iter().any(|v| *v == s.plain()),
            _ => false,
        },
    }
}

/// Apply int-to-float widening where `ty` asks for it.
#[expect(clippy::cast_precision_loss, reason = "int widens to float")]
pub fn coerce(value: Value, ty: &Type) -> Value {
    let Value::Int(i) = value else {
        return value;
    };
    let widen = match ty {
        Type::Float => true,
        Type::Optional(inner) => return coerce(Value::Int(i), inner),
        Type::Union(members) => {
            members.contains(&Type::Float) && !members.contains(&Type::Int)
        }
        _ => false,
    };
    if widen {
        Value::Float(i as f64)
    } else {
        Value::Int(i)
    }
}

/// Check and coerce in one step.
///
/// # Errors
///
/// A RAD30001 type mismatch naming the value and the declared type.
pub fn check(value: Value, ty: &Type) -> Result<Value, EvalError> {
    if is_assignable(&value, ty) {
        Ok(coerce(value, ty))
    } else {
        Err(type_mismatch(mismatch_message(&value, ty)))
    }
}

pub fn mismatch_message(value: &Value, ty: &Type) -> String {
    format!(
        "Value '{}' ({}) is not compatible with expected type '{ty}'",
        value.repr(false),
        value.type_name()
    )
}

/// Whether the declared type accepts ints but not floats, which is where
/// scientific-notation literals must be whole numbers.
pub fn wants_int_only(ty: &Type) -> bool {
    match ty {
        Type::Int => true,
        Type::Optional(inner) => wants_int_only(inner),
        Type::Union(members) => {
            members.iter().any(wants_int_only) && !members.iter().any(wants_float)
        }
        _ => false,
    }
}

/// Why a scientific-notation literal cannot stand in for an int.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotAnInt {
    Fractional,
    OutOfRange,
}

/// The int a scientific-notation literal denotes, if it is whole and fits
/// in an `i64`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "the value is whole and inside the i64 range"
)]
pub fn scientific_int(f: f64) -> Result<i64, NotAnInt> {
    // 2^63, exactly representable; i64::MAX is not.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if !f.is_finite() || f.fract() != 0.0 {
        return Err(NotAnInt::Fractional);
    }
    if !(-LIMIT..LIMIT).contains(&f) {
        return Err(NotAnInt::OutOfRange);
    }
    Ok(f as i64)
}

fn wants_float(ty: &Type) -> bool {
    match ty {
        Type::Float | Type::Any => true,
        Type::Optional(inner) => wants_float(inner),
        Type::Union(members) => members.iter().any(wants_float),
        _ => false,
    }
}

#[cfg(test)]
mod tests;
